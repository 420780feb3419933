//! Baseline snapshot inspection and reload.

use axum::{extract::State, Json};
use likely_common::{ApiError, BaselineEntry, Ethnicity};
use likely_scoring::BaselineProvider;
use serde::Serialize;
use tracing::info;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct BaselineSummary {
    pub entries: usize,
    pub ethnicities: Vec<Ethnicity>,
    pub mean_rate: Option<f64>,
    pub table: Vec<BaselineEntry>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub entries: usize,
}

/// GET /api/baseline - Summary of the snapshot the engine is scoring with
pub async fn baseline_summary(State(state): State<SharedState>) -> Result<Json<BaselineSummary>, ApiError> {
    let table = state.baseline.snapshot().map_err(ApiError::internal)?;
    Ok(Json(BaselineSummary {
        entries: table.len(),
        ethnicities: table.ethnicities(),
        mean_rate: table.mean_rate(),
        table: table.entries().cloned().collect(),
    }))
}

/// POST /api/baseline/reload - Swap in the table currently stored
pub async fn reload_baseline(State(state): State<SharedState>) -> Result<Json<ReloadResponse>, ApiError> {
    let entries = state.reload_baseline().await.map_err(ApiError::internal)?;
    info!(entries, "Baseline reloaded");
    Ok(Json(ReloadResponse { entries }))
}
