//! Demographic categories and historical registry records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ethnicity categories of the historical registry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ethnicity {
    White,
    Black,
    Hispanic,
    #[serde(rename = "Asian or Pacific Islander", alias = "Asian")]
    AsianOrPacificIslander,
    #[serde(rename = "Native American")]
    NativeAmerican,
    Other,
}

impl Ethnicity {
    pub const ALL: [Ethnicity; 6] = [
        Ethnicity::White,
        Ethnicity::Black,
        Ethnicity::Hispanic,
        Ethnicity::AsianOrPacificIslander,
        Ethnicity::NativeAmerican,
        Ethnicity::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
            Self::Hispanic => "Hispanic",
            Self::AsianOrPacificIslander => "Asian or Pacific Islander",
            Self::NativeAmerican => "Native American",
            Self::Other => "Other",
        }
    }

    /// Registry `race_eth` code (1–6). Code 9 and anything else is missing.
    pub fn from_registry_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::White),
            2 => Some(Self::Black),
            3 => Some(Self::Hispanic),
            4 => Some(Self::AsianOrPacificIslander),
            5 => Some(Self::NativeAmerican),
            6 => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Ethnicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ethnicity: {0:?}")]
pub struct UnknownEthnicity(pub String);

impl FromStr for Ethnicity {
    type Err = UnknownEthnicity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case("asian") {
            return Ok(Self::AsianOrPacificIslander);
        }
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownEthnicity(s.to_string()))
    }
}

/// One extracted row of historical registry data.
///
/// Any absent field marks the record as incomplete; incomplete records never
/// contribute to a baseline aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub age: Option<u32>,
    pub ethnicity: Option<Ethnicity>,
    pub cases: Option<u64>,
}

impl HistoricalRecord {
    pub fn new(age: u32, ethnicity: Ethnicity, cases: u64) -> Self {
        Self {
            age: Some(age),
            ethnicity: Some(ethnicity),
            cases: Some(cases),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.age.is_some() && self.ethnicity.is_some() && self.cases.is_some()
    }
}
