//! Aggregation of historical records into the baseline rate table.

use std::collections::BTreeMap;

use likely_common::{BaselineEntry, BaselineTable, DataValidationError, Ethnicity, HistoricalRecord};
use tracing::{debug, info};

/// Fields every record needs to contribute to a cohort.
pub const REQUIRED_FIELDS: [&str; 3] = ["age", "ethnicity", "cases"];

/// Group complete records by exact (age, ethnicity) and compute
/// `risk_rate = Σ cases / record count` per group.
///
/// Incomplete records are dropped, never bucketed as their own category.
/// Fails when nothing survives the filter.
pub fn build_baseline(records: &[HistoricalRecord]) -> Result<BaselineTable, DataValidationError> {
    let mut groups: BTreeMap<(Ethnicity, u32), (u64, u64)> = BTreeMap::new();

    for record in records {
        let (Some(age), Some(ethnicity), Some(cases)) = (record.age, record.ethnicity, record.cases) else {
            continue;
        };
        let slot = groups.entry((ethnicity, age)).or_insert((0, 0));
        slot.0 = slot.0.saturating_add(cases);
        slot.1 += 1;
    }

    if groups.is_empty() {
        return Err(DataValidationError::no_complete_records(&REQUIRED_FIELDS));
    }

    let kept: u64 = groups.values().map(|(_, n)| n).sum();
    debug!(records_read = records.len(), records_kept = kept, "records filtered");

    let table = BaselineTable::from_entries(
        groups
            .into_iter()
            .map(|((ethnicity, age), (cases, n))| BaselineEntry::new(age, ethnicity, cases, n)),
    );
    info!(entries = table.len(), "baseline table built");
    Ok(table)
}
