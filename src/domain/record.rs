// ============================================================
// DUTY RECORD TYPES
// ============================================================
// Canonical row and per-importer aggregate, plus the field
// vocabulary both of them can render for templates.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Canonical fields a template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    SrNo,
    BeNumber,
    BeDate,
    ImporterName,
    Address,
    EightDigitHsCode,
    FullItemDescription,
    AssessableValueAmount,
    BcdRate,
    IgstRate,
    TotalDutyPaidAmount,
    EffectiveRateOfDuty,
    DutyPayable,
    DifferentialDuty,
    ChaDetails,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::SrNo,
        Field::BeNumber,
        Field::BeDate,
        Field::ImporterName,
        Field::Address,
        Field::EightDigitHsCode,
        Field::FullItemDescription,
        Field::AssessableValueAmount,
        Field::BcdRate,
        Field::IgstRate,
        Field::TotalDutyPaidAmount,
        Field::EffectiveRateOfDuty,
        Field::DutyPayable,
        Field::DifferentialDuty,
        Field::ChaDetails,
    ];
}

/// Anything the template engine can pull named values from.
pub trait FieldSource {
    /// Rendered text for `field`, `None` when the source has no value.
    fn field_value(&self, field: Field) -> Option<String>;

    fn importer_name(&self) -> Option<&str>;
}

/// One normalized input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub sr_no: Option<i64>,
    pub be_number: Option<String>,
    pub be_date: Option<String>,
    pub importer_name: Option<String>,
    pub address: Option<String>,
    pub eight_digit_hs_code: Option<String>,
    pub full_item_description: Option<String>,
    pub assessable_value_amount: Option<BigDecimal>,
    pub bcd_rate: Option<String>,
    pub igst_rate: Option<String>,
    pub total_duty_paid_amount: Option<BigDecimal>,
    pub effective_rate_of_duty: Option<String>,
    pub duty_payable: Option<BigDecimal>,
    pub differential_duty: Option<BigDecimal>,
    pub cha_details: Option<String>,
}

impl FieldSource for Record {
    fn field_value(&self, field: Field) -> Option<String> {
        match field {
            Field::SrNo => self.sr_no.map(|n| n.to_string()),
            Field::BeNumber => self.be_number.clone(),
            Field::BeDate => self.be_date.clone(),
            Field::ImporterName => self.importer_name.clone(),
            Field::Address => self.address.clone(),
            Field::EightDigitHsCode => self.eight_digit_hs_code.clone(),
            Field::FullItemDescription => self.full_item_description.clone(),
            Field::AssessableValueAmount => {
                self.assessable_value_amount.as_ref().map(|d| d.to_string())
            }
            Field::BcdRate => self.bcd_rate.clone(),
            Field::IgstRate => self.igst_rate.clone(),
            Field::TotalDutyPaidAmount => {
                self.total_duty_paid_amount.as_ref().map(|d| d.to_string())
            }
            Field::EffectiveRateOfDuty => self.effective_rate_of_duty.clone(),
            Field::DutyPayable => self.duty_payable.as_ref().map(|d| d.to_string()),
            Field::DifferentialDuty => self.differential_duty.as_ref().map(|d| d.to_string()),
            Field::ChaDetails => self.cha_details.clone(),
        }
    }

    fn importer_name(&self) -> Option<&str> {
        self.importer_name.as_deref()
    }
}

/// One importer's records folded together.
///
/// Joined fields use `", "` as separator and are empty when nothing
/// contributed; sums are zero in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRecord {
    pub importer_name: String,
    pub address: String,
    pub aggregated_hs_codes: String,
    pub aggregated_be_numbers: String,
    pub aggregated_be_dates: String,
    pub aggregated_descriptions: String,
    pub aggregated_bcd_rates: String,
    pub aggregated_igst_rates: String,
    pub aggregated_effective_rates: String,
    pub aggregated_cha_details: String,
    pub aggregated_sr_nos: String,
    pub total_differential_duty: BigDecimal,
    pub total_assessable_value: BigDecimal,
    pub total_duty_paid: BigDecimal,
    pub total_duty_payable: BigDecimal,
}

impl FieldSource for AggregatedRecord {
    fn field_value(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::SrNo => self.aggregated_sr_nos.clone(),
            Field::BeNumber => self.aggregated_be_numbers.clone(),
            Field::BeDate => self.aggregated_be_dates.clone(),
            Field::ImporterName => self.importer_name.clone(),
            Field::Address => self.address.clone(),
            Field::EightDigitHsCode => self.aggregated_hs_codes.clone(),
            Field::FullItemDescription => self.aggregated_descriptions.clone(),
            Field::AssessableValueAmount => self.total_assessable_value.to_string(),
            Field::BcdRate => self.aggregated_bcd_rates.clone(),
            Field::IgstRate => self.aggregated_igst_rates.clone(),
            Field::TotalDutyPaidAmount => self.total_duty_paid.to_string(),
            Field::EffectiveRateOfDuty => self.aggregated_effective_rates.clone(),
            Field::DutyPayable => self.total_duty_payable.to_string(),
            Field::DifferentialDuty => self.total_differential_duty.to_string(),
            Field::ChaDetails => self.aggregated_cha_details.clone(),
        };
        Some(value)
    }

    fn importer_name(&self) -> Option<&str> {
        Some(&self.importer_name)
    }
}
