// Placeholder names a template may use, mapped to record fields.
//
// Names are matched after trimming, lowercasing and collapsing inner
// whitespace, so `{{ Importer   Name }}` and `{{importer name}}` agree.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::record::Field;

pub const PLACEHOLDER_VOCABULARY: &[(&str, Field)] = &[
    ("importer name", Field::ImporterName),
    ("address", Field::Address),
    ("description", Field::FullItemDescription),
    ("full item description", Field::FullItemDescription),
    ("fullitemdescription", Field::FullItemDescription),
    ("item description", Field::FullItemDescription),
    ("eight digit hs code", Field::EightDigitHsCode),
    ("hs code", Field::EightDigitHsCode),
    ("bcd rate", Field::BcdRate),
    ("igst rate", Field::IgstRate),
    ("differential duty", Field::DifferentialDuty),
    ("sr. no.", Field::SrNo),
    ("sr no", Field::SrNo),
    ("srno", Field::SrNo),
    ("be number", Field::BeNumber),
    ("benumber", Field::BeNumber),
    ("be date", Field::BeDate),
    ("bedate", Field::BeDate),
    ("assessable value amount", Field::AssessableValueAmount),
    ("assessablevalueamount", Field::AssessableValueAmount),
    ("assessable value", Field::AssessableValueAmount),
    ("total duty paid amount", Field::TotalDutyPaidAmount),
    ("totaldutypaidamount", Field::TotalDutyPaidAmount),
    ("duty paid", Field::TotalDutyPaidAmount),
    ("effective rate of duty", Field::EffectiveRateOfDuty),
    ("effectiverateofduty", Field::EffectiveRateOfDuty),
    ("effective rate", Field::EffectiveRateOfDuty),
    ("duty payable", Field::DutyPayable),
    ("dutypayable", Field::DutyPayable),
    ("cha details", Field::ChaDetails),
    ("chadetails", Field::ChaDetails),
    ("cha", Field::ChaDetails),
];

static VOCABULARY_INDEX: Lazy<HashMap<&'static str, Field>> =
    Lazy::new(|| PLACEHOLDER_VOCABULARY.iter().copied().collect());

pub fn normalize_placeholder_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Field for a raw placeholder name, if it is part of the vocabulary.
pub fn resolve_placeholder(raw: &str) -> Option<Field> {
    VOCABULARY_INDEX
        .get(normalize_placeholder_name(raw).as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_reachable() {
        for field in Field::ALL {
            assert!(
                PLACEHOLDER_VOCABULARY.iter().any(|(_, f)| *f == field),
                "{:?} has no placeholder name",
                field
            );
        }
    }

    #[test]
    fn test_names_are_already_normalized() {
        for (name, _) in PLACEHOLDER_VOCABULARY {
            assert_eq!(normalize_placeholder_name(name), *name);
        }
    }

    #[test]
    fn test_resolve_ignores_case_and_spacing() {
        assert_eq!(resolve_placeholder(" Importer   Name "), Some(Field::ImporterName));
        assert_eq!(resolve_placeholder("BE Number"), Some(Field::BeNumber));
        assert_eq!(resolve_placeholder("benumber"), Some(Field::BeNumber));
        assert_eq!(resolve_placeholder("Sr. No."), Some(Field::SrNo));
        assert_eq!(resolve_placeholder("Duty\tPaid"), Some(Field::TotalDutyPaidAmount));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(resolve_placeholder("customs officer"), None);
        assert_eq!(resolve_placeholder(""), None);
    }
}
