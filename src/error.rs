//! Error types for fusion-engine
//!
//! The fusion pipeline reports a classified error kind rather than a
//! blanket internal error: decode and feature failures are the caller's
//! input, model failures are the upstream bridge, I/O failures are ours.
//! `ApiError` maps each kind to a distinct status code and a structured
//! JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::model::ModelError;

/// Fusion pipeline error, classified by failure stage
#[derive(Debug, Error)]
pub enum FusionError {
    /// Malformed or undecodable audio input
    #[error("Decode error: {0}")]
    Decode(String),

    /// Feature extraction failed (degenerate or too-short audio)
    #[error("Feature extraction error: {0}")]
    Feature(String),

    /// Sample-rate conversion failed
    #[error("Resample error: {0}")]
    Resample(String),

    /// WAV encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Generative model invocation failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Temp file or other I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400) - e.g., missing multipart part
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Classified fusion pipeline failure
    #[error(transparent)]
    Fusion(#[from] FusionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Fusion(err) => {
                let (status, code) = match &err {
                    FusionError::Decode(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR"),
                    FusionError::Feature(_) => (StatusCode::UNPROCESSABLE_ENTITY, "FEATURE_ERROR"),
                    FusionError::Resample(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "RESAMPLE_ERROR")
                    }
                    FusionError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENCODE_ERROR"),
                    FusionError::Model(_) => (StatusCode::BAD_GATEWAY, "MODEL_ERROR"),
                    FusionError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
                };
                (status, code, err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
