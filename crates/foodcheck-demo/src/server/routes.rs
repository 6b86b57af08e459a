use crate::interface::Prediction;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::time::Instant;

// ============================================================================
// Health endpoints
// ============================================================================

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.adapter.model_id(),
        "labels": state.adapter.labels(),
    }))
}

// ============================================================================
// Interface endpoints
// ============================================================================

pub async fn get_interface(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.interface.as_ref().clone())
}

// ============================================================================
// Prediction endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<Prediction>, ApiError> {
    let start = Instant::now();
    metrics::counter!("foodcheck_requests_total").increment(1);

    let result = state.adapter.classify(&req.text).await.map_err(|e| {
        metrics::counter!("foodcheck_errors_total").increment(1);
        tracing::error!("Classification failed: {}", e);
        ApiError::from(e)
    })?;

    let elapsed_us = start.elapsed().as_micros() as u64;
    metrics::histogram!("foodcheck_inference_latency_us").record(elapsed_us as f64);

    let prediction = Prediction::from_result(&result, state.interface.num_top_classes);
    tracing::debug!(
        label = prediction.label.as_deref().unwrap_or("<none>"),
        latency_us = elapsed_us,
        "Prediction served"
    );

    Ok(Json(prediction))
}

// ============================================================================
// Metrics endpoint
// ============================================================================

pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Classifier failure rendered as a JSON error body
#[derive(Debug)]
pub struct ApiError(foodcheck_core::Error);

impl From<foodcheck_core::Error> for ApiError {
    fn from(err: foodcheck_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
