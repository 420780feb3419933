//! CSV extraction of historical registry data.
//!
//! Two layouts are understood:
//! - `raw`: registry extract with coded columns `age_group_5_years`,
//!   `race_eth` and `count` (any other column is ignored)
//! - `tidy`: already-cleaned columns `age`, `ethnicity` and `cases`

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use likely_common::{DataValidationError, HistoricalRecord, LikelyError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::transform::{decode_raw_row, decode_tidy_row};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvFormat {
    #[default]
    Raw,
    Tidy,
}

impl CsvFormat {
    /// Header names for (age, ethnicity, case count), in that order.
    pub fn columns(&self) -> [&'static str; 3] {
        match self {
            Self::Raw => ["age_group_5_years", "race_eth", "count"],
            Self::Tidy => ["age", "ethnicity", "cases"],
        }
    }
}

impl fmt::Display for CsvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Tidy => f.write_str("tidy"),
        }
    }
}

impl FromStr for CsvFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "tidy" => Ok(Self::Tidy),
            other => Err(format!("unknown CSV format {other:?} (expected raw or tidy)")),
        }
    }
}

/// Read and decode every row of the CSV file at `path`.
pub fn extract_csv(path: &Path, format: CsvFormat) -> Result<Vec<HistoricalRecord>> {
    let file = std::fs::File::open(path)?;
    let records = read_records(file, format)?;
    info!(file = %path.display(), %format, n = records.len(), "CSV extracted");
    Ok(records)
}

/// Decode CSV from any reader. Fails when a required column is absent.
pub fn read_records<R: io::Read>(reader: R, format: CsvFormat) -> Result<Vec<HistoricalRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let wanted = format.columns();

    let mut idx = [0usize; 3];
    let mut missing = Vec::new();
    for (slot, name) in idx.iter_mut().zip(wanted) {
        match headers.iter().position(|h| h == name) {
            Some(i) => *slot = i,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LikelyError::DataValidation(DataValidationError::missing_columns(missing)));
    }

    let decode = match format {
        CsvFormat::Raw => decode_raw_row,
        CsvFormat::Tidy => decode_tidy_row,
    };

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(decode(row.get(idx[0]), row.get(idx[1]), row.get(idx[2])));
    }

    debug!(n = records.len(), "CSV rows decoded");
    Ok(records)
}

/// List `<prefix>*.csv` files in `dir`, sorted by name.
pub fn discover_sources(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_file() && name.starts_with(prefix) && name.ends_with(".csv") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(LikelyError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no {prefix}*.csv files found in {}", dir.display()),
        )));
    }
    Ok(files)
}
