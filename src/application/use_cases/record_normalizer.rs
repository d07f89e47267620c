// ============================================================
// RECORD NORMALIZER
// ============================================================
// Row mappings -> canonical duty records. Coercion failures leave
// a field empty; they never drop the row or stop the batch.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::application::use_cases::duty_record_schema::HeaderIndex;
use crate::domain::record::{Field, Record};
use crate::domain::table::{DecodedTable, RowMap};

/// Normalize every row of a decoded table, building the header index once.
pub fn normalize_table(table: &DecodedTable) -> Vec<Record> {
    let index = HeaderIndex::new(&table.headers);
    let records: Vec<Record> = table
        .row_maps()
        .map(|row| normalize_with_index(&index, &row))
        .collect();

    let missing_importer = records
        .iter()
        .filter(|r| r.importer_name.is_none())
        .count();
    tracing::info!(
        records = records.len(),
        missing_importer,
        "Normalized duty records"
    );
    records
}

/// Normalize a single row mapping.
pub fn normalize_row(row: &RowMap<'_>) -> Record {
    let index = HeaderIndex::new(row.headers());
    normalize_with_index(&index, row)
}

fn normalize_with_index(index: &HeaderIndex, row: &RowMap<'_>) -> Record {
    let raw = |field: Field| index.column_for(field).map(|column| row.value_at(column));
    let text = |field: Field| raw(field).and_then(coerce_text);
    let decimal = |field: Field| raw(field).and_then(coerce_decimal);

    Record {
        sr_no: raw(Field::SrNo).and_then(coerce_integer),
        be_number: text(Field::BeNumber),
        be_date: text(Field::BeDate),
        importer_name: text(Field::ImporterName),
        address: text(Field::Address),
        eight_digit_hs_code: text(Field::EightDigitHsCode),
        full_item_description: text(Field::FullItemDescription),
        assessable_value_amount: decimal(Field::AssessableValueAmount),
        bcd_rate: text(Field::BcdRate),
        igst_rate: text(Field::IgstRate),
        total_duty_paid_amount: decimal(Field::TotalDutyPaidAmount),
        effective_rate_of_duty: text(Field::EffectiveRateOfDuty),
        duty_payable: decimal(Field::DutyPayable),
        differential_duty: decimal(Field::DifferentialDuty),
        cha_details: text(Field::ChaDetails),
    }
}

pub fn coerce_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Keep digits (and a minus sign only in front), then parse.
pub fn coerce_integer(raw: &str) -> Option<i64> {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if c == '-' && cleaned.is_empty() {
            cleaned.push(c);
        }
    }
    cleaned.parse::<i64>().ok()
}

/// Strip thousands separators and percent signs, then parse exactly.
pub fn coerce_decimal(raw: &str) -> Option<BigDecimal> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    BigDecimal::from_str(cleaned).ok()
}
