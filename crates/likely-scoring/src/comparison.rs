//! Chart data comparing the user's baseline with the population.

use likely_common::{BaselineTable, Ethnicity};
use serde::{Deserialize, Serialize};

/// Parallel (age, rate) sequences plus the user's own point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    /// Ages with an entry for the user's ethnicity, ascending.
    pub age_groups: Vec<u32>,
    pub ethnicity_rates: Vec<f64>,
    /// Every age in the table, ascending.
    pub average_ages: Vec<u32>,
    /// Mean rate across ethnicities at each of `average_ages`.
    pub average_rates: Vec<f64>,
    pub user_age: u32,
    pub user_risk: f64,
}

impl ComparisonSeries {
    /// Series with no data: what a client gets when no table is loaded.
    pub fn unavailable(user_age: u32) -> Self {
        Self { user_age, ..Self::default() }
    }

    pub fn build(table: &BaselineTable, age: u32, ethnicity: Ethnicity, user_risk: f64) -> Self {
        if table.is_empty() {
            return Self::unavailable(age);
        }
        let (age_groups, ethnicity_rates) = table.series_for(ethnicity).into_iter().unzip();
        let (average_ages, average_rates) = table.mean_rate_by_age().into_iter().unzip();
        Self {
            age_groups,
            ethnicity_rates,
            average_ages,
            average_rates,
            user_age: age,
            user_risk,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.age_groups.is_empty() && self.average_ages.is_empty()
    }
}
