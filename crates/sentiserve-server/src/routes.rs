//! HTTP routes and handlers

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use sentiserve_classifiers::ProbabilityEstimator;
use sentiserve_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::state::{AppState, ModelState};
use crate::static_files;

/// Form fields that may carry the text, highest priority first
pub const TEXT_FIELDS: [&str; 3] = ["text", "input_text", "user_text"];

/// Decoded form fields in body order; names may repeat
pub type FormFields = Vec<(String, String)>;

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(static_files::index))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model_loaded": state.model.is_loaded(),
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Successful prediction body
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Main prediction handler
async fn predict(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let result = run_prediction(&state, request).await;

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    metrics::counter!("sentiserve_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("sentiserve_prediction_latency_us")
        .record(start.elapsed().as_micros() as f64);

    result.into_response()
}

async fn run_prediction(
    state: &AppState,
    request: Request,
) -> std::result::Result<Json<PredictionResponse>, ApiError> {
    let predictor = match state.model.as_ref() {
        ModelState::Loaded(predictor) => predictor,
        ModelState::Failed(e) => return Err(ApiError::ModelUnavailable(e.to_string())),
    };

    let fields = read_form(request).await?;

    let text = extract_text(&fields);
    if text.is_empty() {
        return Err(ApiError::EmptyInput);
    }

    let inputs = vec![text.to_string()];
    let label = predictor
        .predict(&inputs)
        .await
        .map_err(|e| ApiError::PredictionFailed(e.to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::PredictionFailed("predictor returned no labels".to_string()))?;

    let mut response = PredictionResponse {
        prediction: label.to_string(),
        confidence: None,
    };

    if let Some(estimator) = predictor.probabilities() {
        match confidence(estimator, &inputs).await {
            Ok(value) => response.confidence = Some(value),
            Err(e) => {
                debug!("Skipping confidence for '{}': {}", predictor.name(), e);
                metrics::counter!("sentiserve_confidence_skipped_total").increment(1);
            }
        }
    }

    Ok(Json(response))
}

/// Decode a urlencoded or multipart form body.
///
/// A body that is not a readable form counts as having no fields. Only an
/// oversized body is an error.
async fn read_form(request: Request) -> std::result::Result<FormFields, ApiError> {
    let multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if multipart {
        return read_multipart(request).await;
    }

    match Form::<FormFields>::from_request(request, &()).await {
        Ok(Form(fields)) => Ok(fields),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::PayloadTooLarge)
        }
        Err(rejection) => {
            debug!("Request body is not a form, treating as empty: {}", rejection);
            Ok(Vec::new())
        }
    }
}

/// Text fields of a multipart body. File uploads are not form fields.
async fn read_multipart(request: Request) -> std::result::Result<FormFields, ApiError> {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Multipart body rejected, treating as empty: {}", rejection);
            return Ok(Vec::new());
        }
    };

    let mut fields = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(fields),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiError::PayloadTooLarge)
            }
            Err(e) => {
                debug!("Malformed multipart body, treating as empty: {}", e);
                return Ok(Vec::new());
            }
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        match field.text().await {
            Ok(value) => fields.push((name, value)),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiError::PayloadTooLarge)
            }
            Err(e) => {
                debug!("Unreadable multipart field '{}', treating body as empty: {}", name, e);
                return Ok(Vec::new());
            }
        }
    }
}

/// First non-empty value among the text fields, trimmed.
///
/// A repeated field name contributes only its first value.
pub fn extract_text(fields: &[(String, String)]) -> &str {
    TEXT_FIELDS
        .iter()
        .filter_map(|name| {
            fields
                .iter()
                .find(|(key, _)| key.as_str() == *name)
                .map(|(_, value)| value)
        })
        .find(|value| !value.is_empty())
        .map(|value| value.trim())
        .unwrap_or("")
}

/// Highest class probability of the first input, rounded to 4 places
async fn confidence(estimator: &dyn ProbabilityEstimator, inputs: &[String]) -> Result<f64> {
    let vectors = estimator.predict_proba(inputs).await?;
    let first = vectors
        .first()
        .ok_or_else(|| Error::prediction("no probability vectors returned"))?;
    let max = first
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| Error::prediction("empty probability vector"))?;

    if !max.is_finite() {
        return Err(Error::prediction(format!("non-finite probability {max}")));
    }
    round4(max)
}

/// Round half-to-even on the exact binary value, like Python's `round(x, 4)`
fn round4(value: f64) -> Result<f64> {
    format!("{value:.4}")
        .parse::<f64>()
        .map_err(|e| Error::prediction(format!("cannot round probability {value}: {e}")))
}

async fn fallback() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Per-request errors
#[derive(Debug)]
pub enum ApiError {
    EmptyInput,
    PayloadTooLarge,
    ModelUnavailable(String),
    PredictionFailed(String),
}

impl ApiError {
    fn outcome(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::PayloadTooLarge => "payload_too_large",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::PredictionFailed(_) => "prediction_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::EmptyInput => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No text provided" }),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": "Payload too large" }),
            ),
            ApiError::ModelUnavailable(details) => {
                warn!("Rejecting prediction, model not loaded");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Model not loaded", "details": details }),
                )
            }
            ApiError::PredictionFailed(details) => {
                error!("Prediction failed: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Prediction failed", "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
