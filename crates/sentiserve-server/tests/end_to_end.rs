//! End-to-end tests against real model files
//!
//! Model files are written to a temp dir, loaded through the startup path
//! and served by the full router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sentiserve_server::{create_router, AppState, ModelState, PredictionResponse};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const LINEAR_MODEL: &str = r#"{
    "kind": "linear",
    "name": "reviews",
    "labels": ["negative", "positive"],
    "bias": [0.0, 0.0],
    "weights": {
        "great": [-2.0, 2.0],
        "terrible": [2.5, -2.5]
    }
}"#;

fn app_for(dir: &TempDir, file: &str, contents: &str) -> Router {
    let path = dir.path().join(file);
    std::fs::write(&path, contents).unwrap();
    create_router(AppState::new(ModelState::load(&path)), 64 * 1024)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_linear_model_prediction() {
    let dir = TempDir::new().unwrap();
    let app = app_for(&dir, "sentiment_model.json", LINEAR_MODEL);

    let (status, body) = send(&app, predict_request("text=great+product")).await;
    assert_eq!(status, StatusCode::OK);

    let response: PredictionResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.prediction, "positive");
    // softmax([-2, 2])[1]
    let expected = 1.0 / (1.0 + (-4.0f64).exp());
    let confidence = response.confidence.expect("linear models report confidence");
    assert!((confidence - (expected * 10_000.0).round() / 10_000.0).abs() < 1e-12);

    let (status, body) = send(&app, predict_request("input_text=terrible")).await;
    assert_eq!(status, StatusCode::OK);
    let response: PredictionResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.prediction, "negative");
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn test_yaml_lexicon_model_has_no_confidence() {
    let dir = TempDir::new().unwrap();
    let app = app_for(
        &dir,
        "sentiment_model.yaml",
        "kind: lexicon\npositive: [love]\nnegative: [hate]\n",
    );

    let (status, body) = send(&app, predict_request("user_text=I+hate+mondays")).await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "prediction": "negative" }));
}

#[tokio::test]
async fn test_unreadable_model_reports_every_attempt() {
    let dir = TempDir::new().unwrap();
    let app = app_for(&dir, "sentiment_model.json", "\u{0}garbage[");

    let (status, body) = send(&app, predict_request("text=ok")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Model not loaded");
    let details = json["details"].as_str().unwrap();
    assert!(details.starts_with("Failed to load model. Attempts: {json: "));
    #[cfg(feature = "yaml")]
    assert!(details.contains(", yaml: "));
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let dir = TempDir::new().unwrap();

    let loaded = app_for(&dir, "sentiment_model.json", LINEAR_MODEL);
    let (status, body) = send(&loaded, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "ok", "model_loaded": true }));

    let missing = create_router(
        AppState::new(ModelState::load(dir.path().join("absent.json"))),
        64 * 1024,
    );
    let (status, body) = send(&missing, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["model_loaded"], false);
}

#[tokio::test]
async fn test_landing_page_and_fallback() {
    let dir = TempDir::new().unwrap();
    let app = app_for(&dir, "sentiment_model.json", LINEAR_MODEL);

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains(r#"action="/predict""#));
    assert!(html.contains(r#"name="text""#));

    let (status, body) = send(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Not found");
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let dir = TempDir::new().unwrap();
    let app = app_for(&dir, "sentiment_model.json", LINEAR_MODEL);

    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
