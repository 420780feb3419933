//! Questionnaire scoring.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use likely_common::ApiError;
use likely_db::NewSubmission;
use likely_scoring::{RiskForm, RiskLevel, RiskResult, UserProfile};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    /// Same value as `risk_level`, under the name older clients read.
    pub risk_estimate: RiskLevel,
    #[serde(flatten)]
    pub result: RiskResult,
    pub user_summary: UserProfile,
    /// Absent when the submission could not be logged.
    pub submission_id: Option<Uuid>,
}

/// POST /score - Score a questionnaire and log the submission
pub async fn score(
    State(state): State<SharedState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let form = RiskForm::from_json(body)?;
    let full_data = serde_json::to_value(&form).map_err(ApiError::internal)?;

    let (profile, result) = state.engine.score_form(form)?;

    let submission = NewSubmission {
        age: profile.age,
        ethnicity: profile.ethnicity.to_string(),
        relatives_with_cancer: profile.relatives_with_cancer,
        brca_known: label(&profile.brca_known),
        anxiety_level: profile.anxiety_level.to_string(),
        risk_level: result.risk_level.to_string(),
        risk_percentage: result.risk_percentage,
        full_data,
    };
    let submission_id = match state.submissions().insert(&submission).await {
        Ok(id) => {
            debug!(%id, "Submission logged");
            Some(id)
        }
        Err(e) => {
            warn!(error = %e, "Failed to log submission");
            None
        }
    };

    Ok(Json(ScoreResponse {
        risk_estimate: result.risk_level,
        result,
        user_summary: profile,
        submission_id,
    }))
}

/// Serialized label of a unit enum.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}
