//! Baseline batch job.
//!
//! Orchestrates one rebuild of the stored baseline:
//!   1. Discover source CSV files in the data directory
//!   2. Extract and decode every row
//!   3. Aggregate the complete records into a baseline table
//!   4. Replace the stored historical records and swap the persisted
//!      baseline table in one transaction
//!
//! Called from the `likely build-baseline` command. `rebuild_from_store`
//! skips the CSV stages and re-aggregates the records already stored.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use likely_common::HistoricalRecord;
use likely_db::{BaselineRepository, Database, HistoricalRepository};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::builder::build_baseline;
use crate::extract::{discover_sources, extract_csv, CsvFormat};

// ── Job config ────────────────────────────────────────────────────────────────

/// Parameters for a single baseline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineJob {
    pub data_dir: PathBuf,
    /// Only files named `<file_prefix>*.csv` are read.
    pub file_prefix: String,
    pub format: CsvFormat,
}

impl Default for BaselineJob {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/raw"),
            file_prefix: "breast_cancer_risk_data".to_string(),
            format: CsvFormat::Raw,
        }
    }
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BaselineJobResult {
    pub job_id: Uuid,
    pub files: Vec<PathBuf>,
    pub records_read: usize,
    pub records_kept: usize,
    pub entries: usize,
    pub duration_ms: u64,
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Run the full CSV → database → baseline flow for one job.
///
/// Any failure leaves both the stored records and the stored baseline as
/// they were, so the previously persisted table stays live.
#[instrument(skip(db), fields(data_dir = %job.data_dir.display(), format = %job.format))]
pub async fn run_baseline_job(job: &BaselineJob, db: Arc<Database>) -> anyhow::Result<BaselineJobResult> {
    let job_id = Uuid::new_v4();
    let t0 = Instant::now();
    info!(job_id = %job_id, "Starting baseline job");

    let files = discover_sources(&job.data_dir, &job.file_prefix)
        .with_context(|| format!("discovering sources in {}", job.data_dir.display()))?;

    let format = job.format;
    let to_read = files.clone();
    let records = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<HistoricalRecord>> {
        let mut all = Vec::new();
        for path in &to_read {
            let mut rows = extract_csv(path, format)
                .with_context(|| format!("reading {}", path.display()))?;
            all.append(&mut rows);
        }
        Ok(all)
    })
    .await
    .context("CSV extraction task failed")??;

    let records_read = records.len();
    let records_kept = records.iter().filter(|r| r.is_complete()).count();
    info!(files = files.len(), records_read, records_kept, "Records extracted");

    // Validate before anything is written.
    let table = build_baseline(&records)?;

    let entries = BaselineRepository::new(db)
        .replace_with_records(&records, &table)
        .await
        .context("storing historical records and baseline table")?;

    let result = BaselineJobResult {
        job_id,
        files,
        records_read,
        records_kept,
        entries,
        duration_ms: t0.elapsed().as_millis() as u64,
    };
    info!(job_id = %job_id, entries, duration_ms = result.duration_ms, "Baseline job complete");
    Ok(result)
}

/// Re-aggregate the stored historical records and swap the stored baseline.
#[instrument(skip(db))]
pub async fn rebuild_from_store(db: Arc<Database>) -> anyhow::Result<BaselineJobResult> {
    let job_id = Uuid::new_v4();
    let t0 = Instant::now();

    let records = HistoricalRepository::new(db.clone())
        .load_all()
        .await
        .context("loading historical records")?;
    let records_read = records.len();
    let records_kept = records.iter().filter(|r| r.is_complete()).count();

    let table = build_baseline(&records)?;
    let entries = BaselineRepository::new(db)
        .replace(&table)
        .await
        .context("swapping baseline table")?;

    let result = BaselineJobResult {
        job_id,
        files: Vec::new(),
        records_read,
        records_kept,
        entries,
        duration_ms: t0.elapsed().as_millis() as u64,
    };
    info!(job_id = %job_id, records_read, records_kept, entries, "Baseline rebuilt from store");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use likely_common::Ethnicity;
    use pretty_assertions::assert_eq;

    async fn db() -> Arc<Database> {
        let db = Database::open_in_memory().await.unwrap();
        db.initialize().await.unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn test_rebuild_from_store() {
        let db = db().await;
        HistoricalRepository::new(db.clone())
            .replace_all(&[
                HistoricalRecord::new(30, Ethnicity::White, 2),
                HistoricalRecord::new(30, Ethnicity::White, 0),
                HistoricalRecord::default(),
            ])
            .await
            .unwrap();

        let result = rebuild_from_store(db.clone()).await.unwrap();
        assert_eq!((result.records_read, result.records_kept, result.entries), (3, 2, 1));

        let table = BaselineRepository::new(db).load().await.unwrap();
        assert_eq!(table.get(30, Ethnicity::White).unwrap().risk_rate, 1.0);
    }

    #[tokio::test]
    async fn test_rebuild_from_empty_store_fails() {
        let db = db().await;
        assert!(rebuild_from_store(db).await.is_err());
    }
}
