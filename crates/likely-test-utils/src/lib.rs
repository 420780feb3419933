//! Fixtures shared by the workspace's tests.
//!
//! Questionnaires are handed out as JSON so that any crate can deserialize
//! them into its own form type.

use std::path::{Path, PathBuf};

use likely_common::{BaselineEntry, BaselineTable, Ethnicity};
use serde_json::{json, Value};

/// A complete questionnaire that triggers no adjustment factor at all:
/// every multiplier stays at 1.0.
pub fn neutral_form() -> Value {
    json!({
        "symptom": "breast lump",
        "age": 35,
        "gender": "Female",
        "location": "Nepal",
        "access_healthcare": "Yes",
        "age_menarche": 13,
        "age_thelarche": 12,
        "menopause": "No",
        "age_menopause": null,
        "pregnancy": "Prefer not to say",
        "pregnancy_age": null,
        "breastfeeding": "No",
        "pcos": "No",
        "hormonal_use": "No",
        "relatives_with_cancer": 0,
        "brca_known": "No",
        "ethnicity": "White",
        "had_mammo": "No",
        "breast_density": "No",
        "benign_lumps": "No",
        "smoking": "No",
        "alcohol": "No",
        "exercise": "3–5x/week",
        "anxiety_level": "Low"
    })
}

/// `neutral_form` with the given fields overwritten.
pub fn form_with(overrides: Value) -> Value {
    let mut form = neutral_form();
    if let (Some(base), Some(extra)) = (form.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    form
}

/// A high-risk questionnaire: three affected relatives, known BRCA
/// mutation, high anxiety.
pub fn high_risk_form() -> Value {
    form_with(json!({
        "relatives_with_cancer": 3,
        "brca_known": "Yes",
        "anxiety_level": "High"
    }))
}

/// White-only table at ages 30, 40, 50 with rates 0.01, 0.02, 0.06.
pub fn white_only_table() -> BaselineTable {
    BaselineTable::from_entries(vec![
        BaselineEntry::new(30, Ethnicity::White, 1, 100),
        BaselineEntry::new(40, Ethnicity::White, 2, 100),
        BaselineEntry::new(50, Ethnicity::White, 6, 100),
    ])
}

/// Two ethnicities sharing ages 30 and 40.
pub fn two_group_table() -> BaselineTable {
    BaselineTable::from_entries(vec![
        BaselineEntry::new(30, Ethnicity::White, 1, 100),
        BaselineEntry::new(40, Ethnicity::White, 3, 100),
        BaselineEntry::new(30, Ethnicity::Black, 3, 100),
        BaselineEntry::new(40, Ethnicity::Black, 5, 100),
    ])
}

/// Registry-coded extract. Two rows carry the unknown marker (9) and are
/// expected to be dropped by the builder.
pub const RAW_CSV_SAMPLE: &str = "\
year,age_group_5_years,race_eth,first_degree_hx,count
2005,3,1,0,2
2005,3,1,1,0
2005,5,2,0,5
2006,9,1,0,4
2006,3,9,0,7
";

pub const TIDY_CSV_SAMPLE: &str = "\
age,ethnicity,cases
30,White,2
30,White,0
40,Black,5
";

/// Write `contents` to `dir/name` and return the path.
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// Temporary data directory holding one raw extract.
pub fn raw_data_dir() -> anyhow::Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    write_csv(dir.path(), "breast_cancer_risk_data_2005.csv", RAW_CSV_SAMPLE)?;
    Ok(dir)
}
