//! Fusion endpoint
//!
//! POST /fuse: multipart form with two file parts, `melody` and `style`.
//! Success is the generated clip as WAV bytes; failures map to the
//! classified statuses in [`crate::error`].

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::info;

use crate::audio::wav;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /fuse
pub async fn fuse(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Response> {
    let mut melody: Option<Vec<u8>> = None;
    let mut style: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("melody") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable melody part: {}", e)))?;
                melody = Some(bytes.to_vec());
            }
            Some("style") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("unreadable style part: {}", e)))?;
                style = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let melody =
        melody.ok_or_else(|| ApiError::BadRequest("missing multipart part: melody".to_string()))?;
    let style =
        style.ok_or_else(|| ApiError::BadRequest("missing multipart part: style".to_string()))?;

    info!(
        melody_bytes = melody.len(),
        style_bytes = style.len(),
        "Fusion request received"
    );

    let generated = state.engine.fuse(melody, style).await?;
    let wav_bytes = wav::encode_wav(&generated)?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], wav_bytes).into_response())
}

/// Build fusion routes
pub fn fuse_routes() -> Router<AppState> {
    Router::new().route("/fuse", post(fuse))
}
