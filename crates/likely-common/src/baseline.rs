//! Baseline incidence table shared by the builder, the store and the scorer.
//!
//! Entries are keyed by (ethnicity, age) so that each ethnicity's series is a
//! contiguous, age-ascending range of the map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::Ethnicity;

/// Aggregated incidence for one (age, ethnicity) cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub age: u32,
    pub ethnicity: Ethnicity,
    pub total_cases: u64,
    pub total_records: u64,
    /// `total_cases / total_records`. Non-negative, not capped at 1.
    pub risk_rate: f64,
}

impl BaselineEntry {
    pub fn new(age: u32, ethnicity: Ethnicity, total_cases: u64, total_records: u64) -> Self {
        let risk_rate = if total_records == 0 {
            0.0
        } else {
            total_cases as f64 / total_records as f64
        };
        Self { age, ethnicity, total_cases, total_records, risk_rate }
    }
}

/// Immutable per-(age, ethnicity) rate table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BaselineEntry>", into = "Vec<BaselineEntry>")]
pub struct BaselineTable {
    entries: BTreeMap<(Ethnicity, u32), BaselineEntry>,
}

impl BaselineTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from entries. A later entry for the same key replaces
    /// an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = BaselineEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| ((e.ethnicity, e.age), e))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by ethnicity, then age.
    pub fn entries(&self) -> impl Iterator<Item = &BaselineEntry> {
        self.entries.values()
    }

    pub fn get(&self, age: u32, ethnicity: Ethnicity) -> Option<&BaselineEntry> {
        self.entries.get(&(ethnicity, age))
    }

    fn cohort(&self, ethnicity: Ethnicity) -> impl Iterator<Item = &BaselineEntry> {
        self.entries
            .range((ethnicity, u32::MIN)..=(ethnicity, u32::MAX))
            .map(|(_, e)| e)
    }

    /// Distinct ethnicities present, in table order.
    pub fn ethnicities(&self) -> Vec<Ethnicity> {
        let mut out: Vec<Ethnicity> = self.entries.keys().map(|(e, _)| *e).collect();
        out.dedup();
        out
    }

    /// (age, rate) pairs for one ethnicity, ascending by age.
    pub fn series_for(&self, ethnicity: Ethnicity) -> Vec<(u32, f64)> {
        self.cohort(ethnicity).map(|e| (e.age, e.risk_rate)).collect()
    }

    /// Entry of the same ethnicity closest in age. Equal distances resolve to
    /// the lower age.
    pub fn nearest(&self, age: u32, ethnicity: Ethnicity) -> Option<&BaselineEntry> {
        let mut best: Option<&BaselineEntry> = None;
        for entry in self.cohort(ethnicity) {
            let closer = match best {
                None => true,
                Some(b) => entry.age.abs_diff(age) < b.age.abs_diff(age),
            };
            if closer {
                best = Some(entry);
            }
        }
        best
    }

    /// Unweighted mean of every entry's rate.
    pub fn mean_rate(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.values().map(|e| e.risk_rate).sum();
        Some(sum / self.entries.len() as f64)
    }

    /// Mean rate across ethnicities for every age present, ascending by age.
    pub fn mean_rate_by_age(&self) -> Vec<(u32, f64)> {
        let mut by_age: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for e in self.entries.values() {
            let slot = by_age.entry(e.age).or_insert((0.0, 0));
            slot.0 += e.risk_rate;
            slot.1 += 1;
        }
        by_age
            .into_iter()
            .map(|(age, (sum, n))| (age, sum / n as f64))
            .collect()
    }
}

impl From<Vec<BaselineEntry>> for BaselineTable {
    fn from(entries: Vec<BaselineEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<BaselineTable> for Vec<BaselineEntry> {
    fn from(table: BaselineTable) -> Self {
        table.entries.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> BaselineTable {
        BaselineTable::from_entries(vec![
            BaselineEntry::new(50, Ethnicity::White, 3, 10),
            BaselineEntry::new(30, Ethnicity::White, 1, 10),
            BaselineEntry::new(40, Ethnicity::White, 2, 10),
            BaselineEntry::new(40, Ethnicity::Black, 4, 10),
        ])
    }

    #[test]
    fn test_series_is_age_ascending() {
        let t = table();
        assert_eq!(t.series_for(Ethnicity::White), vec![(30, 0.1), (40, 0.2), (50, 0.3)]);
        assert!(t.series_for(Ethnicity::Hispanic).is_empty());
    }

    #[test]
    fn test_nearest_prefers_lower_age_on_tie() {
        let t = table();
        assert_eq!(t.nearest(35, Ethnicity::White).map(|e| e.age), Some(30));
        assert_eq!(t.nearest(46, Ethnicity::White).map(|e| e.age), Some(50));
        assert_eq!(t.nearest(99, Ethnicity::Black).map(|e| e.age), Some(40));
        assert!(t.nearest(35, Ethnicity::Other).is_none());
    }

    #[test]
    fn test_mean_rate_by_age() {
        let t = table();
        let by_age = t.mean_rate_by_age();
        assert_eq!(by_age.len(), 3);
        assert_eq!(by_age[1].0, 40);
        assert!((by_age[1].1 - 0.3).abs() < 1e-12);
        assert!((t.mean_rate().unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table() {
        let t = BaselineTable::empty();
        assert!(t.mean_rate().is_none());
        assert!(t.mean_rate_by_age().is_empty());
        assert!(t.ethnicities().is_empty());
    }

    #[test]
    fn test_serde_round_trips_as_list() {
        let t = table();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.is_array());
        let back: BaselineTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
