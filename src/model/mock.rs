//! In-process mock model
//!
//! Deterministic stand-in for the MusicGen bridge: returns a canned
//! waveform and records the last request so tests can assert on the
//! prompt and the normalized melody that reached the model.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::audio::Waveform;
use crate::model::{GenerationParams, MelodyModel, ModelError};

/// What the mock saw on its last `generate` call
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub melody_sample_rate: u32,
    pub melody_channels: u16,
    pub melody_frames: usize,
    pub params: GenerationParams,
}

/// Mock melody model for tests
pub struct MockModel {
    output: Waveform,
    fail: bool,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl MockModel {
    /// Mock returning one second of a quiet 440 Hz tone at 32 kHz
    pub fn new() -> Self {
        let samples: Vec<f32> = (0..32000)
            .map(|i| {
                let t = i as f32 / 32000.0;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.3
            })
            .collect();
        Self::with_output(Waveform::mono(samples, 32000))
    }

    /// Mock returning a caller-supplied waveform
    pub fn with_output(output: Waveform) -> Self {
        Self {
            output,
            fail: false,
            last_request: Mutex::new(None),
        }
    }

    /// Mock whose every generation fails, for error-path tests
    pub fn failing() -> Self {
        let mut mock = Self::new();
        mock.fail = true;
        mock
    }

    /// The request recorded by the most recent `generate` call
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request.lock().ok().and_then(|g| g.clone())
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MelodyModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        melody: &Waveform,
        params: &GenerationParams,
    ) -> Result<Waveform, ModelError> {
        if self.fail {
            return Err(ModelError::Generation(
                "mock configured to fail".to_string(),
            ));
        }

        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(RecordedRequest {
                prompt: prompt.to_string(),
                melody_sample_rate: melody.sample_rate,
                melody_channels: melody.channels,
                melody_frames: melody.frames(),
                params: *params,
            });
        }

        Ok(self.output.clone())
    }
}
