//! fusion-engine library interface
//!
//! Exposes the router and engine for integration testing.

pub mod analysis;
pub mod api;
pub mod audio;
pub mod engine;
pub mod error;
pub mod model;

pub use crate::engine::FusionEngine;
pub use crate::error::{ApiError, ApiResult, FusionError};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uploads are raw audio; axum's 2 MiB default is far too small
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Fusion engine holding the model handle
    pub engine: Arc<FusionEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: Arc<FusionEngine>) -> Self {
        Self {
            engine,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::fuse_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
