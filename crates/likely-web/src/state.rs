//! Shared application state for the web server.

use std::sync::Arc;

use anyhow::Context;
use likely_db::{BaselineRepository, Database, SubmissionRepository};
use likely_scoring::{RiskEngine, SharedBaseline};
use tracing::{info, warn};

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub engine: RiskEngine,
    /// Swappable handle the engine reads its snapshots from.
    pub baseline: Arc<SharedBaseline>,
    pub db: Arc<Database>,
    /// Default page size of `GET /submissions`.
    pub submission_list_limit: u32,
}

impl AppState {
    /// State over `db` with an empty baseline snapshot.
    pub fn new(db: Arc<Database>, submission_list_limit: u32) -> Self {
        let baseline = Arc::new(SharedBaseline::default());
        Self {
            engine: RiskEngine::new(baseline.clone()),
            baseline,
            db,
            submission_list_limit,
        }
    }

    /// State with the stored baseline already loaded. A baseline that
    /// cannot be read leaves the server up on the fallback rate.
    pub async fn load(db: Arc<Database>, submission_list_limit: u32) -> Self {
        let state = Self::new(db, submission_list_limit);
        match state.reload_baseline().await {
            Ok(0) => warn!("Stored baseline is empty; run `likely build-baseline`"),
            Ok(n) => info!(entries = n, "Baseline loaded"),
            Err(e) => warn!(error = %e, "Could not load baseline, scoring with fallback rate"),
        }
        state
    }

    /// Read the stored table and swap it in. Returns the new entry count.
    /// On error the previous snapshot stays in place.
    pub async fn reload_baseline(&self) -> anyhow::Result<usize> {
        let table = BaselineRepository::new(self.db.clone())
            .load()
            .await
            .context("Failed to read stored baseline")?;
        let entries = table.len();
        self.baseline.replace(table)?;
        Ok(entries)
    }

    pub fn submissions(&self) -> SubmissionRepository {
        SubmissionRepository::new(self.db.clone())
    }
}

pub type SharedState = Arc<AppState>;
