//! Baseline rate lookup with explicit fallback tiers.

use likely_common::{BaselineTable, Ethnicity};
use serde::{Deserialize, Serialize};

/// Rate used when no table is available at all.
pub const DEFAULT_BASELINE_RATE: f64 = 0.01;

/// Which tier produced a baseline rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// Same ethnicity, closest age.
    NearestAge,
    /// Ethnicity absent from the table: mean of every entry.
    PopulationMean,
    /// No usable table.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineRisk {
    pub rate: f64,
    pub source: BaselineSource,
}

impl BaselineRisk {
    pub fn default_rate() -> Self {
        Self { rate: DEFAULT_BASELINE_RATE, source: BaselineSource::Default }
    }
}

/// Resolve the baseline rate for (age, ethnicity). Never fails.
///
/// 1. nearest age within the same ethnicity, ties to the lower age
/// 2. mean rate of the whole table
/// 3. [`DEFAULT_BASELINE_RATE`]
pub fn resolve_baseline(table: &BaselineTable, age: u32, ethnicity: Ethnicity) -> BaselineRisk {
    if let Some(entry) = table.nearest(age, ethnicity) {
        return BaselineRisk { rate: entry.risk_rate, source: BaselineSource::NearestAge };
    }
    match table.mean_rate() {
        Some(rate) => BaselineRisk { rate, source: BaselineSource::PopulationMean },
        None => BaselineRisk::default_rate(),
    }
}
