//! Decoding of registry-coded cells into historical record fields.
//!
//! Registry extracts use small integer codes, with 9 reserved for "unknown".

use likely_common::{Ethnicity, HistoricalRecord};

/// Code the registry uses for an unknown value.
pub const MISSING_CODE: i64 = 9;

/// Parse an integer code, tolerating float spellings ("2.0") and blanks.
pub fn parse_code(cell: Option<&str>) -> Option<i64> {
    let cell = cell?.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
        return None;
    }
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    (v.fract() == 0.0 && v.is_finite()).then_some(v as i64)
}

/// Five-year age band code → lower bound of the band.
/// 1 → 20, 2 → 25, … 8 → 55. Code 9 is the unknown marker.
pub fn age_from_group_code(code: i64) -> Option<u32> {
    match code {
        1..=8 => Some(15 + 5 * code as u32),
        _ => None,
    }
}

/// Decode one registry-coded row.
pub fn decode_raw_row(age_group: Option<&str>, race_eth: Option<&str>, count: Option<&str>) -> HistoricalRecord {
    HistoricalRecord {
        age: parse_code(age_group)
            .filter(|c| *c != MISSING_CODE)
            .and_then(age_from_group_code),
        ethnicity: parse_code(race_eth)
            .filter(|c| *c != MISSING_CODE)
            .and_then(Ethnicity::from_registry_code),
        cases: parse_code(count).and_then(|c| u64::try_from(c).ok()),
    }
}

/// Decode one tidy row (`age`, `ethnicity`, `cases`).
pub fn decode_tidy_row(age: Option<&str>, ethnicity: Option<&str>, cases: Option<&str>) -> HistoricalRecord {
    HistoricalRecord {
        age: parse_code(age).and_then(|a| u32::try_from(a).ok()),
        ethnicity: ethnicity
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .and_then(|e| e.parse::<Ethnicity>().ok()),
        cases: parse_code(cases).and_then(|c| u64::try_from(c).ok()),
    }
}
