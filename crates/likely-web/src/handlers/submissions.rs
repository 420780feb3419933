//! Submission log listing.

use axum::{
    extract::{Query, State},
    Json,
};
use likely_common::ApiError;
use likely_db::Submission;
use serde::Deserialize;

use crate::state::SharedState;

const MAX_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize, Default)]
pub struct SubmissionFilter {
    pub limit: Option<u32>,
}

/// GET /submissions - Logged submissions, newest first
pub async fn list_submissions(
    State(state): State<SharedState>,
    Query(filter): Query<SubmissionFilter>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let limit = filter
        .limit
        .unwrap_or(state.submission_list_limit)
        .clamp(1, MAX_LIMIT);

    let rows = state
        .submissions()
        .list(limit)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(rows))
}
