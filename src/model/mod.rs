//! Generative model seam
//!
//! The melody-conditioned generator stays an external collaborator behind
//! the `MelodyModel` trait: the production implementation talks to the
//! MusicGen bridge over HTTP, tests run against the in-process mock.

pub mod mock;
pub mod musicgen;

pub use mock::MockModel;
pub use musicgen::MusicGenBridge;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::audio::Waveform;

/// Sample rate the model expects for melody conditioning input (Hz)
pub const MODEL_INPUT_SAMPLE_RATE: u32 = 32000;

/// Model invocation errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Bridge unreachable or refused at startup
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    /// Generation request failed (transport or bridge-reported)
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Bridge responded with something we cannot decode
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// Fixed generation parameters
///
/// Static policy constants, not derived from input. The defaults match
/// the deployed MusicGen configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Output duration in seconds
    pub duration: f64,
    /// Sample from the token distribution instead of greedy decoding
    pub use_sampling: bool,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Classifier-free guidance coefficient
    pub cfg_coef: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            duration: 15.0,
            use_sampling: true,
            top_k: 250,
            temperature: 0.7,
            cfg_coef: 9.0,
        }
    }
}

/// Melody-conditioned audio generator
#[async_trait]
pub trait MelodyModel: Send + Sync {
    /// Display name of the loaded checkpoint (e.g., "MusicGen-Small")
    fn name(&self) -> &str;

    /// Generate audio following the melody's pitch/rhythm contour,
    /// conditioned on the text prompt.
    ///
    /// `melody` must be mono at [`MODEL_INPUT_SAMPLE_RATE`]. The returned
    /// waveform carries the model's native output sample rate.
    async fn generate(
        &self,
        prompt: &str,
        melody: &Waveform,
        params: &GenerationParams,
    ) -> Result<Waveform, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_fixed_policy() {
        let params = GenerationParams::default();
        assert_eq!(params.duration, 15.0);
        assert!(params.use_sampling);
        assert_eq!(params.top_k, 250);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.cfg_coef, 9.0);
    }
}
