//! MusicGen bridge client
//!
//! The pretrained model runs in its own process (the bridge) and is
//! reached over HTTP. The client probes the bridge once at startup to get
//! the loaded checkpoint and compute device, then posts generation
//! requests with the melody embedded as base64 WAV. Successful responses
//! are WAV bytes at the model's native output rate.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audio::{wav, Waveform};
use crate::model::{GenerationParams, MelodyModel, ModelError};

/// Checkpoint the bridge is expected to serve
pub const PRETRAINED_NAME: &str = "MusicGen-Small";

/// Bridge status payload (GET /)
#[derive(Debug, Deserialize)]
struct BridgeStatus {
    status: String,
    model: String,
    /// "cuda" when the bridge found an accelerator, "cpu" otherwise
    device: String,
}

/// Generation request payload (POST /generate)
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    duration: f64,
    use_sampling: bool,
    top_k: u32,
    temperature: f64,
    cfg_coef: f64,
    melody_sample_rate: u32,
    melody_wav_base64: String,
}

/// HTTP client for the MusicGen bridge
pub struct MusicGenBridge {
    client: reqwest::Client,
    base_url: String,
    model_name: String,
}

impl MusicGenBridge {
    /// Connect to the bridge and verify it is serving.
    ///
    /// Fails fast when the bridge is unreachable so the service never
    /// starts accepting requests it cannot fulfill.
    pub async fn connect(base_url: &str, timeout: Duration) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Unavailable(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();

        let status: BridgeStatus = client
            .get(format!("{}/", base_url))
            .send()
            .await
            .map_err(|e| ModelError::Unavailable(format!("bridge probe failed: {}", e)))?
            .error_for_status()
            .map_err(|e| ModelError::Unavailable(format!("bridge probe failed: {}", e)))?
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("bad status payload: {}", e)))?;

        info!(
            "MusicGen bridge online at {}: {} ({}) on {}",
            base_url, status.status, status.model, status.device
        );
        if status.device != "cuda" {
            info!("Bridge reports no accelerator; generation will run on general-purpose compute");
        }

        Ok(Self {
            client,
            base_url,
            model_name: status.model,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

#[async_trait]
impl MelodyModel for MusicGenBridge {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn generate(
        &self,
        prompt: &str,
        melody: &Waveform,
        params: &GenerationParams,
    ) -> Result<Waveform, ModelError> {
        let melody_wav = wav::encode_wav(melody)
            .map_err(|e| ModelError::Generation(format!("melody encode failed: {}", e)))?;

        let request = GenerateRequest {
            prompt,
            duration: params.duration,
            use_sampling: params.use_sampling,
            top_k: params.top_k,
            temperature: params.temperature,
            cfg_coef: params.cfg_coef,
            melody_sample_rate: melody.sample_rate,
            melody_wav_base64: BASE64.encode(&melody_wav),
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Generation(format!(
                "bridge returned {}: {}",
                status, body
            )));
        }

        let wav_bytes = response
            .bytes()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        wav::decode_wav(&wav_bytes)
            .map_err(|e| ModelError::InvalidResponse(format!("undecodable WAV response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_serializes_params() {
        let request = GenerateRequest {
            prompt: "A test prompt",
            duration: 15.0,
            use_sampling: true,
            top_k: 250,
            temperature: 0.7,
            cfg_coef: 9.0,
            melody_sample_rate: 32000,
            melody_wav_base64: "AAAA".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"], "A test prompt");
        assert_eq!(json["top_k"], 250);
        assert_eq!(json["melody_sample_rate"], 32000);
    }

    #[test]
    fn test_bridge_status_parses() {
        let json = r#"{"status": "ok", "model": "MusicGen-Small", "device": "cuda"}"#;
        let status: BridgeStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.model, PRETRAINED_NAME);
        assert_eq!(status.device, "cuda");
        assert_eq!(status.status, "ok");
    }
}
