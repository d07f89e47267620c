// ============================================================
// TEMPLATE ENGINE
// ============================================================
// Fill `{{ name }}` placeholders in a DOCX template from a
// record or an importer aggregate

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::use_cases::placeholder_vocabulary::resolve_placeholder;
use crate::domain::error::Result;
use crate::domain::record::FieldSource;
use crate::infrastructure::docx::{paragraph_text, replace_paragraph_text, TemplateDocument};

const PLACEHOLDER_OPEN: &str = "{{";

static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").unwrap());

/// One matched `{{ ... }}` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken<'a> {
    /// Byte range of the whole span, markers included
    pub range: Range<usize>,
    /// Exact matched text
    pub span: &'a str,
    /// Text between the markers, untouched
    pub name: &'a str,
}

/// Non-overlapping placeholder spans, left to right.
pub fn scan_placeholders(text: &str) -> Vec<PlaceholderToken<'_>> {
    PLACEHOLDER_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(PlaceholderToken {
                range: whole.range(),
                span: whole.as_str(),
                name: name.as_str(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub resolved: usize,
    pub unresolved: Vec<String>,
}

impl Substitution {
    pub fn changed(&self) -> bool {
        self.resolved > 0
    }
}

/// Replace every resolvable placeholder in `text`. Unknown names keep
/// their original span, markers included.
pub fn substitute_placeholders<S>(text: &str, source: &S) -> Substitution
where
    S: FieldSource + ?Sized,
{
    let mut out = Substitution {
        text: String::with_capacity(text.len()),
        ..Default::default()
    };
    let mut last = 0;

    for token in scan_placeholders(text) {
        out.text.push_str(&text[last..token.range.start]);

        match resolve_placeholder(token.name) {
            Some(field) => {
                out.text
                    .push_str(&source.field_value(field).unwrap_or_default());
                out.resolved += 1;
            }
            None => {
                out.text.push_str(token.span);
                out.unresolved.push(token.name.trim().to_string());
            }
        }

        last = token.range.end;
    }
    out.text.push_str(&text[last..]);
    out
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub document: TemplateDocument,
    pub units_rewritten: usize,
    pub unresolved: Vec<String>,
}

/// Render into a fresh copy of the template; the template itself is not touched.
pub fn render_document<S>(template: &TemplateDocument, source: &S) -> RenderOutcome
where
    S: FieldSource + ?Sized,
{
    let mut document = template.clone();
    let mut units_rewritten = 0;
    let mut unresolved = Vec::new();

    document.for_each_text_unit_mut(|paragraph| {
        let text = paragraph_text(paragraph);
        if !text.contains(PLACEHOLDER_OPEN) {
            return;
        }

        let substitution = substitute_placeholders(&text, source);
        unresolved.extend(substitution.unresolved.iter().cloned());

        if substitution.changed() {
            replace_paragraph_text(paragraph, &substitution.text);
            units_rewritten += 1;
        }
    });

    if !unresolved.is_empty() {
        tracing::debug!(
            template = %template.source(),
            unresolved = ?unresolved,
            "Placeholders left unresolved"
        );
    }

    RenderOutcome {
        document,
        units_rewritten,
        unresolved,
    }
}

/// Render and serialize one document.
pub fn render<S>(template: &TemplateDocument, source: &S) -> Result<Vec<u8>>
where
    S: FieldSource + ?Sized,
{
    render_document(template, source).document.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{AggregatedRecord, Record};
    use bigdecimal::BigDecimal;
    use docx_rs::{DocumentChild, Docx, Paragraph, Run, Table, TableCell, TableRow};
    use std::str::FromStr;

    fn abc_record() -> Record {
        Record {
            importer_name: Some("ABC".to_string()),
            differential_duty: Some(BigDecimal::from_str("6390.9024").unwrap()),
            be_number: Some("8568569".to_string()),
            ..Default::default()
        }
    }

    fn template(docx: Docx) -> TemplateDocument {
        TemplateDocument::from_docx(docx, "memory")
    }

    fn clone_paragraph(paragraph: &Paragraph) -> Paragraph {
        paragraph.clone()
    }

    fn top_level_paragraphs(doc: &TemplateDocument) -> Vec<Paragraph> {
        doc.docx()
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(clone_paragraph(p)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scenario_importer_owes_duty() {
        let result =
            substitute_placeholders("{{Importer Name}} owes {{Differential Duty}}", &abc_record());

        assert_eq!(result.text, "ABC owes 6390.9024");
        assert_eq!(result.resolved, 2);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_unresolved_placeholder_kept_verbatim() {
        let result = substitute_placeholders("Dear {{ Customs  Officer }}, re {{be number}}", &abc_record());

        assert_eq!(result.text, "Dear {{ Customs  Officer }}, re 8568569");
        assert_eq!(result.unresolved, vec!["Customs  Officer".to_string()]);
    }

    #[test]
    fn test_absent_field_renders_empty() {
        let result = substitute_placeholders("[{{address}}]", &abc_record());
        assert_eq!(result.text, "[]");
        assert!(result.changed());
    }

    #[test]
    fn test_scan_is_non_overlapping_and_ordered() {
        let tokens = scan_placeholders("{{a}}{{ b }} {{c");

        let names: Vec<_> = tokens.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", " b "]);
        assert_eq!(tokens[1].span, "{{ b }}");
        assert_eq!(tokens[1].range, 5..12);
    }

    #[test]
    fn test_split_runs_are_substituted() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("To {{Importer "))
                .add_run(Run::new().add_text("Name}}").bold()),
        );

        let outcome = render_document(&template(docx), &abc_record());

        assert_eq!(outcome.units_rewritten, 1);
        assert_eq!(outcome.document.text_units(), vec!["To ABC"]);
    }

    #[test]
    fn test_units_without_placeholder_are_untouched() {
        let plain = Paragraph::new()
            .add_run(Run::new().add_text("Plain "))
            .add_run(Run::new().add_text("bold").bold());
        let only_unknown =
            Paragraph::new().add_run(Run::new().add_text("{{unknown}}").italic());
        let docx = Docx::new()
            .add_paragraph(plain)
            .add_paragraph(only_unknown)
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{{importer name}}")));
        let tpl = template(docx);

        let outcome = render_document(&tpl, &abc_record());

        let before = top_level_paragraphs(&tpl);
        let after = top_level_paragraphs(&outcome.document);
        assert_eq!(before[0], after[0]);
        assert_eq!(before[1], after[1]);
        assert_ne!(before[2], after[2]);
        assert_eq!(outcome.units_rewritten, 1);
        assert_eq!(outcome.unresolved, vec!["unknown".to_string()]);
    }

    #[test]
    fn test_table_cells_are_rendered() {
        let docx = Docx::new().add_table(Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("BE"))),
            TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{{ BE Number }}"))),
        ])]));

        let outcome = render_document(&template(docx), &abc_record());
        assert_eq!(outcome.document.text_units(), vec!["BE", "8568569"]);
    }

    #[test]
    fn test_nested_table_cells_are_rendered() {
        let inner = Table::new(vec![TableRow::new(vec![TableCell::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("owes {{differential duty}}")),
        )])]);
        let docx = Docx::new().add_table(Table::new(vec![TableRow::new(vec![TableCell::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{{importer name}}")))
            .add_table(inner)])]));

        let outcome = render_document(&template(docx), &abc_record());

        assert_eq!(outcome.units_rewritten, 2);
        assert_eq!(outcome.document.text_units(), vec!["ABC", "owes 6390.9024"]);
    }

    #[test]
    fn test_template_is_not_mutated() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{{importer name}}")));
        let tpl = template(docx);

        let _ = render_document(&tpl, &abc_record());
        assert_eq!(tpl.text_units(), vec!["{{importer name}}"]);
    }

    #[test]
    fn test_render_twice_is_identical() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{{importer name}} / {{sr no}}")));
        let tpl = template(docx);

        let first = render_document(&tpl, &abc_record());
        let second = render_document(&tpl, &abc_record());
        assert_eq!(
            top_level_paragraphs(&first.document),
            top_level_paragraphs(&second.document)
        );

        let bytes = render(&tpl, &abc_record()).unwrap();
        let reloaded = TemplateDocument::from_bytes(&bytes, "rendered").unwrap();
        assert_eq!(reloaded.text_units(), vec!["ABC / "]);
    }

    #[test]
    fn test_aggregate_source_renders_joined_values() {
        let aggregate = AggregatedRecord {
            importer_name: "ABC".to_string(),
            address: "S ABD NT".to_string(),
            aggregated_hs_codes: "85444999, 83249099".to_string(),
            aggregated_be_numbers: "8568569".to_string(),
            aggregated_be_dates: String::new(),
            aggregated_descriptions: "Machines, Chemicals".to_string(),
            aggregated_bcd_rates: "0%".to_string(),
            aggregated_igst_rates: "18%".to_string(),
            aggregated_effective_rates: "18%".to_string(),
            aggregated_cha_details: "Agent X, Agent X".to_string(),
            aggregated_sr_nos: "1, 2".to_string(),
            total_differential_duty: BigDecimal::from_str("51514.1824").unwrap(),
            total_assessable_value: BigDecimal::from(0),
            total_duty_paid: BigDecimal::from(0),
            total_duty_payable: BigDecimal::from(0),
        };

        let result = substitute_placeholders(
            "{{importer name}}: {{eight digit hs code}} ({{srno}}) owes {{differential duty}}; {{cha details}}",
            &aggregate,
        );
        assert_eq!(
            result.text,
            "ABC: 85444999, 83249099 (1, 2) owes 51514.1824; Agent X, Agent X"
        );
    }
}
