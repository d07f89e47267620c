// ============================================================
// IMPORTER AGGREGATION
// ============================================================
// Fold duty records into one aggregate per importer, keeping
// first-occurrence order for groups and for every joined list.

use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;

use crate::domain::record::{AggregatedRecord, Record};

const LIST_SEPARATOR: &str = ", ";

/// Group by importer name; records without one are left out.
pub fn aggregate(records: &[Record]) -> Vec<AggregatedRecord> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Record>)> = Vec::new();

    for record in records {
        let Some(importer) = record.importer_name.as_deref() else {
            continue;
        };
        if importer.trim().is_empty() {
            continue;
        }

        match positions.get(importer) {
            Some(&pos) => groups[pos].1.push(record),
            None => {
                positions.insert(importer, groups.len());
                groups.push((importer, vec![record]));
            }
        }
    }

    let aggregated: Vec<AggregatedRecord> = groups
        .into_iter()
        .map(|(importer, members)| fold_group(importer, &members))
        .collect();

    tracing::info!(
        records = records.len(),
        importers = aggregated.len(),
        "Aggregated duty records by importer"
    );
    aggregated
}

fn fold_group(importer: &str, members: &[&Record]) -> AggregatedRecord {
    let address = members
        .iter()
        .filter_map(|r| r.address.as_deref())
        .find(|a| !a.trim().is_empty())
        .unwrap_or_default()
        .to_string();

    let sr_nos = members
        .iter()
        .filter_map(|r| r.sr_no)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR);

    AggregatedRecord {
        importer_name: importer.to_string(),
        address,
        aggregated_hs_codes: join_distinct(members, |r| r.eight_digit_hs_code.as_deref()),
        aggregated_be_numbers: join_distinct(members, |r| r.be_number.as_deref()),
        aggregated_be_dates: join_distinct(members, |r| r.be_date.as_deref()),
        aggregated_descriptions: join_distinct(members, |r| r.full_item_description.as_deref()),
        aggregated_bcd_rates: join_distinct(members, |r| r.bcd_rate.as_deref()),
        aggregated_igst_rates: join_distinct(members, |r| r.igst_rate.as_deref()),
        aggregated_effective_rates: join_distinct(members, |r| {
            r.effective_rate_of_duty.as_deref()
        }),
        aggregated_cha_details: join_all(members, |r| r.cha_details.as_deref()),
        aggregated_sr_nos: sr_nos,
        total_differential_duty: sum(members, |r| r.differential_duty.as_ref()),
        total_assessable_value: sum(members, |r| r.assessable_value_amount.as_ref()),
        total_duty_paid: sum(members, |r| r.total_duty_paid_amount.as_ref()),
        total_duty_payable: sum(members, |r| r.duty_payable.as_ref()),
    }
}

fn non_blank<'a>(
    members: &'a [&'a Record],
    get: fn(&Record) -> Option<&str>,
) -> impl Iterator<Item = &'a str> {
    members
        .iter()
        .filter_map(move |r| get(r))
        .filter(|v| !v.trim().is_empty())
}

/// Non-blank values in order, duplicates dropped by exact string equality.
fn join_distinct(members: &[&Record], get: fn(&Record) -> Option<&str>) -> String {
    let mut seen = HashSet::new();
    non_blank(members, get)
        .filter(|v| seen.insert(*v))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Non-blank values in order, duplicates kept.
fn join_all(members: &[&Record], get: fn(&Record) -> Option<&str>) -> String {
    non_blank(members, get)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Exact sum; absent values count as zero.
fn sum(members: &[&Record], get: fn(&Record) -> Option<&BigDecimal>) -> BigDecimal {
    members
        .iter()
        .filter_map(|r| get(r))
        .fold(BigDecimal::from(0), |acc, value| acc + value)
}
