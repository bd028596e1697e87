//! Health and status endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::model::musicgen::PRETRAINED_NAME;
use crate::AppState;

/// GET /
///
/// Fixed status payload, returned unconditionally regardless of model
/// state. External monitoring contract of the original service.
pub async fn root_status() -> Json<Value> {
    Json(json!({
        "status": "Fusion Engine Online",
        "model": PRETRAINED_NAME,
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok" while the process serves)
    pub status: String,
    /// Module name
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Name of the loaded model
    pub model: String,
}

/// GET /health
///
/// Monitoring endpoint with uptime and version.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "fusion-engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        model: state.engine.model_name().to_string(),
    })
}

/// Build health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_status))
        .route("/health", get(health_check))
}
