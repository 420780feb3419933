//! Axum router — maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    baseline::{baseline_summary, reload_baseline},
    score::score,
    submissions::list_submissions,
    system::root,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",            get(root))
        .route("/score",       post(score))
        .route("/submissions", get(list_submissions))

        // Baseline management
        .route("/api/baseline",        get(baseline_summary))
        .route("/api/baseline/reload", post(reload_baseline))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
