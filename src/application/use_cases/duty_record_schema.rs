// Centralized header alias configuration for duty record normalization.
//
// Goal: keep spreadsheet/CSV header matching flexible without scattering alias lists.

use std::collections::HashMap;

use crate::domain::record::Field;

// NOTE:
// - Aliases are listed primary spelling first.
// - Matching strategy (first hit wins):
//   1) exact header match, trying every alias in order
//   2) trimmed + lowercased header match, trying every alias in order

pub const SR_NO_ALIASES: &[&str] = &["Sr. No.", "Sr No", "Sr. No"];
pub const BE_NUMBER_ALIASES: &[&str] = &["BE Number"];
pub const BE_DATE_ALIASES: &[&str] = &["BE Date"];
pub const IMPORTER_NAME_ALIASES: &[&str] = &["Importer Name"];
pub const ADDRESS_ALIASES: &[&str] = &["ADDRESS", "Address"];
pub const HS_CODE_ALIASES: &[&str] = &["Eight Digit HS Code"];
pub const DESCRIPTION_ALIASES: &[&str] = &["Full Item Description"];
pub const ASSESSABLE_VALUE_ALIASES: &[&str] = &["Assessable Value Amount"];
pub const BCD_RATE_ALIASES: &[&str] = &["BCD Rate"];
pub const IGST_RATE_ALIASES: &[&str] = &["IGST Rate"];
pub const TOTAL_DUTY_PAID_ALIASES: &[&str] = &["Total Duty Paid Amount"];
pub const EFFECTIVE_RATE_ALIASES: &[&str] =
    &["Effective Rate of duty (BCD@35% + SWS@10% + IGST@28%)"];
pub const DUTY_PAYABLE_ALIASES: &[&str] = &["Duty Payable"];
pub const DIFFERENTIAL_DUTY_ALIASES: &[&str] = &["Differential Duty"];
pub const CHA_DETAILS_ALIASES: &[&str] = &["CHA details", "CHA Details", "CHA"];

pub fn field_aliases(field: Field) -> &'static [&'static str] {
    match field {
        Field::SrNo => SR_NO_ALIASES,
        Field::BeNumber => BE_NUMBER_ALIASES,
        Field::BeDate => BE_DATE_ALIASES,
        Field::ImporterName => IMPORTER_NAME_ALIASES,
        Field::Address => ADDRESS_ALIASES,
        Field::EightDigitHsCode => HS_CODE_ALIASES,
        Field::FullItemDescription => DESCRIPTION_ALIASES,
        Field::AssessableValueAmount => ASSESSABLE_VALUE_ALIASES,
        Field::BcdRate => BCD_RATE_ALIASES,
        Field::IgstRate => IGST_RATE_ALIASES,
        Field::TotalDutyPaidAmount => TOTAL_DUTY_PAID_ALIASES,
        Field::EffectiveRateOfDuty => EFFECTIVE_RATE_ALIASES,
        Field::DutyPayable => DUTY_PAYABLE_ALIASES,
        Field::DifferentialDuty => DIFFERENTIAL_DUTY_ALIASES,
        Field::ChaDetails => CHA_DETAILS_ALIASES,
    }
}

pub fn normalize_header(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Header -> column lookup built once per table.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    exact: HashMap<String, usize>,
    normalized: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut index = Self::default();
        for (column, header) in headers.iter().enumerate() {
            index.exact.entry(header.clone()).or_insert(column);
            index
                .normalized
                .entry(normalize_header(header))
                .or_insert(column);
        }
        index
    }

    /// Column holding `field`, if any header spells one of its aliases.
    pub fn column_for(&self, field: Field) -> Option<usize> {
        let aliases = field_aliases(field);

        aliases
            .iter()
            .find_map(|alias| self.exact.get(*alias).copied())
            .or_else(|| {
                aliases
                    .iter()
                    .find_map(|alias| self.normalized.get(&normalize_header(alias)).copied())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_field_has_a_primary_alias() {
        for field in Field::ALL {
            assert!(!field_aliases(field).is_empty(), "{:?} has no alias", field);
        }
    }

    #[test]
    fn test_exact_match_preferred_over_normalized() {
        let index = HeaderIndex::new(&headers(&["address", "Address"]));
        assert_eq!(index.column_for(Field::Address), Some(1));
    }

    #[test]
    fn test_stray_whitespace_and_case() {
        let index = HeaderIndex::new(&headers(&[" sr. no. ", "IMPORTER NAME ", "cha details "]));

        assert_eq!(index.column_for(Field::SrNo), Some(0));
        assert_eq!(index.column_for(Field::ImporterName), Some(1));
        assert_eq!(index.column_for(Field::ChaDetails), Some(2));
        assert_eq!(index.column_for(Field::BeNumber), None);
    }

    #[test]
    fn test_secondary_alias() {
        let index = HeaderIndex::new(&headers(&["Sr No", "CHA"]));

        assert_eq!(index.column_for(Field::SrNo), Some(0));
        assert_eq!(index.column_for(Field::ChaDetails), Some(1));
    }

    #[test]
    fn test_duplicate_header_first_column_wins() {
        let index = HeaderIndex::new(&headers(&["BE Number", "BE Number"]));
        assert_eq!(index.column_for(Field::BeNumber), Some(0));
    }
}
