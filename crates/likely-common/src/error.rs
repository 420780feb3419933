use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while reading historical input.
#[derive(Debug, Error)]
pub enum LikelyError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    DataValidation(#[from] DataValidationError),
}

pub type Result<T> = std::result::Result<T, LikelyError>;

/// Historical input that cannot produce a baseline table.
///
/// `missing` names the columns or fields the input failed to provide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("historical data rejected: {reason} (fields: {})", .missing.join(", "))]
pub struct DataValidationError {
    pub missing: Vec<String>,
    pub reason: String,
}

impl DataValidationError {
    pub fn missing_columns(columns: Vec<String>) -> Self {
        Self {
            missing: columns,
            reason: "required columns are absent".to_string(),
        }
    }

    pub fn no_complete_records(required: &[&str]) -> Self {
        Self {
            missing: required.iter().map(|s| s.to_string()).collect(),
            reason: "no record carries every required field".to_string(),
        }
    }
}

/// A questionnaire that cannot be turned into a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("profile rejected: missing [{}], invalid [{}]", .missing.join(", "), .invalid.join(", "))]
pub struct SchemaValidationError {
    pub missing: Vec<String>,
    pub invalid: Vec<String>,
}

impl SchemaValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

// ── HTTP mapping ─────────────────────────────────────────────────────────────

/// Error returned by web handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Schema(e) => json!({
                "error": "profile validation failed",
                "missing": e.missing,
                "invalid": e.invalid,
            }),
            Self::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                json!({ "error": "internal error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
