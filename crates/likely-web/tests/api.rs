use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use likely_db::{BaselineRepository, Database};
use likely_test_utils::{form_with, high_risk_form, neutral_form, white_only_table};
use likely_web::{router::build_router, state::AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

async fn database() -> Arc<Database> {
    let db = Database::open_in_memory().await.unwrap();
    db.initialize().await.unwrap();
    Arc::new(db)
}

async fn app_with_baseline() -> (Router, Arc<Database>) {
    let db = database().await;
    BaselineRepository::new(db.clone()).replace(&white_only_table()).await.unwrap();
    let state = AppState::load(db.clone(), 100).await;
    (build_router(state), db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn root_reports_live() {
    let (app, _) = app_with_baseline().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Risk scoring backend is live." }));
}

#[tokio::test]
async fn score_returns_result_and_logs_submission() {
    let (app, _) = app_with_baseline().await;

    let (status, body) = send(&app, "POST", "/score", Some(neutral_form())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_estimate"], json!("Very Low"));
    assert_eq!(body["risk_level"], json!("Very Low"));
    assert_eq!(body["baseline_source"], json!("nearest_age"));
    assert_eq!(body["chart_data"]["age_groups"], json!([30, 40, 50]));
    assert_eq!(body["user_summary"]["ethnicity"], json!("White"));
    assert!(body["submission_id"].is_string());

    send(&app, "POST", "/score", Some(high_risk_form())).await;

    let (status, rows) = send(&app, "GET", "/submissions", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first.
    assert_eq!(rows[0]["brca_known"], json!("Yes"));
    assert_eq!(rows[1]["brca_known"], json!("No"));

    let (_, limited) = send(&app, "GET", "/submissions?limit=1", None).await;
    assert_eq!(limited.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn incomplete_form_is_unprocessable() {
    let (app, _) = app_with_baseline().await;
    let mut form = neutral_form();
    form.as_object_mut().unwrap().remove("ethnicity");

    let (status, body) = send(&app, "POST", "/score", Some(form)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["missing"], json!(["ethnicity"]));
}

#[tokio::test]
async fn wrong_typed_field_is_reported_as_json() {
    let (app, _) = app_with_baseline().await;

    let (status, body) = send(&app, "POST", "/score", Some(form_with(json!({ "age": "35" })))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["missing"], json!([]));
    let invalid = body["invalid"].as_array().unwrap();
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].as_str().unwrap().starts_with("age:"), "got {invalid:?}");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (app, _) = app_with_baseline().await;
    let request = Request::builder()
        .method("POST")
        .uri("/score")
        .header("content-type", "application/json")
        .body(Body::from("{\"age\": 35,"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_store_scores_with_fallback() {
    let app = build_router(AppState::load(database().await, 100).await);

    let (status, body) = send(&app, "POST", "/score", Some(neutral_form())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseline_source"], json!("default"));
    assert_eq!(body["chart_data"]["user_risk"], json!(0.0));
}

#[tokio::test]
async fn reload_picks_up_new_table() {
    let db = database().await;
    let app = build_router(AppState::load(db.clone(), 100).await);

    let (_, summary) = send(&app, "GET", "/api/baseline", None).await;
    assert_eq!(summary["entries"], json!(0));

    BaselineRepository::new(db).replace(&white_only_table()).await.unwrap();
    let (status, reloaded) = send(&app, "POST", "/api/baseline/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded["entries"], json!(3));

    let (_, summary) = send(&app, "GET", "/api/baseline", None).await;
    assert_eq!(summary["ethnicities"], json!(["White"]));
    assert_eq!(summary["table"].as_array().unwrap().len(), 3);
}
