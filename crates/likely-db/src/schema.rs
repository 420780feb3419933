//! Table names and DDL.

pub const TABLE_RISK_FACTORS: &str = "risk_factors";
pub const TABLE_RISK_BASELINE: &str = "risk_baseline";
pub const TABLE_SUBMISSIONS: &str = "risk_submissions";

/// Baseline rows are written here first, then renamed over the live table.
pub const TABLE_RISK_BASELINE_STAGING: &str = "risk_baseline_next";

pub const CREATE_RISK_FACTORS: &str = r#"
    CREATE TABLE IF NOT EXISTS risk_factors (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        age       INTEGER,
        ethnicity TEXT,
        cases     INTEGER
    )
"#;

pub const CREATE_SUBMISSIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS risk_submissions (
        id                    TEXT PRIMARY KEY,
        submitted_at          TEXT NOT NULL,
        age                   INTEGER NOT NULL,
        ethnicity             TEXT NOT NULL,
        relatives_with_cancer INTEGER NOT NULL,
        brca_known            TEXT NOT NULL,
        anxiety_level         TEXT NOT NULL,
        risk_level            TEXT NOT NULL,
        risk_percentage       REAL NOT NULL,
        full_data             TEXT NOT NULL
    )
"#;

/// DDL for a baseline table under `name` (live or staging).
pub fn baseline_table_ddl(name: &str) -> String {
    format!(
        r#"
    CREATE TABLE IF NOT EXISTS {name} (
        age           INTEGER NOT NULL,
        ethnicity     TEXT NOT NULL,
        total_cases   INTEGER NOT NULL,
        total_records INTEGER NOT NULL,
        risk_rate     REAL NOT NULL,
        PRIMARY KEY (age, ethnicity)
    )
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_ddl_uses_name() {
        let ddl = baseline_table_ddl(TABLE_RISK_BASELINE_STAGING);
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS risk_baseline_next"));
        assert!(ddl.contains("PRIMARY KEY (age, ethnicity)"));
    }
}
