// ============================================================
// DOCX TEMPLATE DOCUMENT
// ============================================================
// Load a .docx template, walk its text-bearing paragraphs in a
// fixed order, and serialize the result back to bytes

use std::io::Cursor;
use std::path::Path;

use docx_rs::{
    BreakType, DocumentChild, Docx, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table,
    TableCellContent, TableChild, TableRowChild,
};

use crate::domain::error::{AppError, Result};

/// Parsed template. Treated as an immutable value; renders work on clones.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    docx: Docx,
    source: String,
}

impl TemplateDocument {
    /// Read and parse a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::error!(template = %path.display(), "Template file missing");
            return Err(AppError::TemplateNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path).map_err(|e| {
            AppError::TemplateError(format!(
                "Failed to read template {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_bytes(&bytes, &path.display().to_string())
    }

    pub fn from_bytes(bytes: &[u8], source: &str) -> Result<Self> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| {
            tracing::error!(template = %source, error = %e, "Failed to parse template");
            AppError::TemplateError(format!("Failed to parse DOCX template {}: {}", source, e))
        })?;

        Ok(Self {
            docx,
            source: source.to_string(),
        })
    }

    pub fn from_docx(docx: Docx, source: &str) -> Self {
        Self {
            docx,
            source: source.to_string(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn docx(&self) -> &Docx {
        &self.docx
    }

    /// Text of every text-bearing unit, in traversal order.
    pub fn text_units(&self) -> Vec<String> {
        let mut units = Vec::new();
        for child in &self.docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                units.push(paragraph_text(paragraph));
            }
        }
        for child in &self.docx.document.children {
            if let DocumentChild::Table(table) = child {
                collect_table_text(table, &mut units);
            }
        }
        units
    }

    /// Visit every text-bearing unit: top-level paragraphs first, then
    /// each table row-major, cell paragraphs before nested tables.
    pub fn for_each_text_unit_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Paragraph),
    {
        for child in self.docx.document.children.iter_mut() {
            if let DocumentChild::Paragraph(paragraph) = child {
                visit(paragraph);
            }
        }
        for child in self.docx.document.children.iter_mut() {
            if let DocumentChild::Table(table) = child {
                visit_table_mut(table, &mut visit);
            }
        }
    }

    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        let source = self.source;
        self.docx.build().pack(&mut cursor).map_err(|e| {
            AppError::TemplateError(format!(
                "Failed to serialize document from {}: {}",
                source, e
            ))
        })?;
        Ok(cursor.into_inner())
    }
}

fn collect_table_text(table: &Table, units: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    units.push(paragraph_text(paragraph));
                }
            }
            for content in &cell.children {
                if let TableCellContent::Table(nested) = content {
                    collect_table_text(nested, units);
                }
            }
        }
    }
}

fn visit_table_mut<F>(table: &mut Table, visit: &mut F)
where
    F: FnMut(&mut Paragraph),
{
    for row in table.rows.iter_mut() {
        let TableChild::TableRow(row) = row;
        for cell in row.cells.iter_mut() {
            let TableRowChild::TableCell(cell) = cell;
            for content in cell.children.iter_mut() {
                if let TableCellContent::Paragraph(paragraph) = content {
                    visit(paragraph);
                }
            }
            for content in cell.children.iter_mut() {
                if let TableCellContent::Table(nested) = content {
                    visit_table_mut(nested, visit);
                }
            }
        }
    }
}

/// Concatenated visible text of a paragraph.
pub fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut buffer = String::new();
    for child in &paragraph.children {
        push_paragraph_child_text(child, &mut buffer);
    }
    buffer
}

fn push_paragraph_child_text(child: &ParagraphChild, buffer: &mut String) {
    match child {
        ParagraphChild::Run(run) => push_run_text(run, buffer),
        ParagraphChild::Hyperlink(link) => {
            for link_child in &link.children {
                push_paragraph_child_text(link_child, buffer);
            }
        }
        ParagraphChild::Insert(insert) => {
            for insert_child in &insert.children {
                if let InsertChild::Run(run) = insert_child {
                    push_run_text(run, buffer);
                }
            }
        }
        _ => {}
    }
}

fn push_run_text(run: &Run, buffer: &mut String) {
    for child in &run.children {
        match child {
            // docx-rs keeps run text XML-escaped
            RunChild::Text(text) => buffer.push_str(&unescape_xml(&text.text)),
            RunChild::Tab(_) | RunChild::PTab(_) => buffer.push('\t'),
            RunChild::Break(_) => buffer.push('\n'),
            RunChild::Sym(sym) => buffer.push_str(&sym.char),
            _ => {}
        }
    }
}

/// Drop the paragraph's text-bearing children and append one plain run
/// carrying `text`. Paragraph properties and non-text children stay.
pub fn replace_paragraph_text(paragraph: &mut Paragraph, text: &str) {
    paragraph.children.retain(|child| {
        !matches!(
            child,
            ParagraphChild::Run(_)
                | ParagraphChild::Hyperlink(_)
                | ParagraphChild::Insert(_)
                | ParagraphChild::Delete(_)
        )
    });

    let rebuilt = std::mem::take(paragraph).add_run(plain_run(text));
    *paragraph = rebuilt;
}

fn plain_run(text: &str) -> Run {
    let mut run = Run::new();
    for (line_idx, line) in text.split('\n').enumerate() {
        if line_idx > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        for (seg_idx, segment) in line.split('\t').enumerate() {
            if seg_idx > 0 {
                run = run.add_tab();
            }
            if !segment.is_empty() {
                run = run.add_text(segment);
            }
        }
    }
    run
}

fn unescape_xml(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{TableCell, TableRow};

    fn sample_docx() -> Docx {
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Intro")))
            .add_table(Table::new(vec![TableRow::new(vec![
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("A1"))),
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("B1"))),
            ])]))
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Tail "))
                    .add_run(Run::new().add_text("part").bold()),
            )
    }

    #[test]
    fn test_text_units_paragraphs_then_tables() {
        let doc = TemplateDocument::from_docx(sample_docx(), "memory");

        assert_eq!(doc.text_units(), vec!["Intro", "Tail part", "A1", "B1"]);
    }

    fn nested_docx() -> Docx {
        let inner = Table::new(vec![TableRow::new(vec![TableCell::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("inner")))])]);
        let outer_cell = TableCell::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("A1 first")))
            .add_table(inner)
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("A1 second")));

        Docx::new().add_table(Table::new(vec![TableRow::new(vec![
            outer_cell,
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("B1"))),
        ])]))
    }

    #[test]
    fn test_nested_table_follows_cell_paragraphs() {
        let mut doc = TemplateDocument::from_docx(nested_docx(), "memory");

        assert_eq!(doc.text_units(), vec!["A1 first", "A1 second", "inner", "B1"]);

        let mut seen = Vec::new();
        doc.for_each_text_unit_mut(|p| seen.push(paragraph_text(p)));
        assert_eq!(seen, doc.text_units());
    }

    #[test]
    fn test_mut_visit_matches_read_order() {
        let mut doc = TemplateDocument::from_docx(sample_docx(), "memory");
        let mut seen = Vec::new();
        doc.for_each_text_unit_mut(|p| seen.push(paragraph_text(p)));

        assert_eq!(seen, doc.text_units());
    }

    #[test]
    fn test_replace_collapses_runs() {
        let mut paragraph = Paragraph::new()
            .add_run(Run::new().add_text("{{Importer "))
            .add_run(Run::new().add_text("Name}}").bold());

        replace_paragraph_text(&mut paragraph, "ABC\tLtd\nLine 2");

        let runs = paragraph
            .children
            .iter()
            .filter(|c| matches!(c, ParagraphChild::Run(_)))
            .count();
        assert_eq!(runs, 1);
        assert_eq!(paragraph_text(&paragraph), "ABC\tLtd\nLine 2");
    }

    #[test]
    fn test_special_characters_survive_replace() {
        let mut paragraph = Paragraph::new().add_run(Run::new().add_text("x"));
        replace_paragraph_text(&mut paragraph, "A & B <C>");

        assert_eq!(paragraph_text(&paragraph), "A & B <C>");
    }

    #[test]
    fn test_bytes_round_trip() {
        let bytes = TemplateDocument::from_docx(sample_docx(), "memory")
            .to_bytes()
            .unwrap();
        let reloaded = TemplateDocument::from_bytes(&bytes, "memory").unwrap();

        assert_eq!(reloaded.text_units(), vec!["Intro", "Tail part", "A1", "B1"]);
    }

    #[test]
    fn test_missing_template_is_reported() {
        let err = TemplateDocument::load(Path::new("/definitely/not/here/Rough.docx")).unwrap_err();
        assert!(matches!(err, AppError::TemplateNotFound(_)));
    }

    #[test]
    fn test_unreadable_template_is_template_error() {
        let err = TemplateDocument::from_bytes(b"not a docx", "bad.docx").unwrap_err();
        assert!(matches!(err, AppError::TemplateError(_)));
    }
}
