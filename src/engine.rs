//! Fusion pipeline
//!
//! One entry point, `FusionEngine::fuse`: spill the uploaded buffers to
//! scoped temp files, extract tempo and brightness from the style
//! reference, build the conditioning prompt, normalize the melody to the
//! model's input format, and invoke the generator. Decode and analysis
//! run on the blocking pool; generation is serialized behind a
//! single-permit gate so concurrent uploads queue for the model instead
//! of contending for its compute device.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::analysis::{build_prompt, estimate_bpm, mean_spectral_centroid};
use crate::audio::{decode_file, resample_mono, Waveform};
use crate::error::FusionError;
use crate::model::{GenerationParams, MelodyModel, ModelError, MODEL_INPUT_SAMPLE_RATE};

/// How much of the style reference is analyzed (seconds)
pub const STYLE_ANALYSIS_SECONDS: f64 = 10.0;

/// Melody + style fusion engine
pub struct FusionEngine {
    model: Arc<dyn MelodyModel>,
    params: GenerationParams,
    generation_gate: Semaphore,
    spill_dir: PathBuf,
}

impl FusionEngine {
    pub fn new(model: Arc<dyn MelodyModel>) -> Self {
        Self {
            model,
            params: GenerationParams::default(),
            generation_gate: Semaphore::new(1),
            spill_dir: std::env::temp_dir(),
        }
    }

    /// Spill uploads into `dir` instead of the system temp directory.
    ///
    /// Lets tests observe that a request leaves nothing behind.
    pub fn with_spill_dir(mut self, dir: PathBuf) -> Self {
        self.spill_dir = dir;
        self
    }

    /// Display name of the underlying model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Fuse a melody recording with a style reference into generated audio.
    ///
    /// Returns the generated waveform at the model's native output rate.
    pub async fn fuse(
        &self,
        melody_bytes: Vec<u8>,
        style_bytes: Vec<u8>,
    ) -> Result<Waveform, FusionError> {
        // Decode + DSP are CPU-bound; keep them off the async threads
        let spill_dir = self.spill_dir.clone();
        let (prompt, melody) = tokio::task::spawn_blocking(move || {
            prepare_inputs(&melody_bytes, &style_bytes, &spill_dir)
        })
        .await
        .map_err(|e| {
            FusionError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })??;

        info!(prompt = %prompt, "Invoking melody-conditioned generation");

        let _permit = self
            .generation_gate
            .acquire()
            .await
            .map_err(|_| ModelError::Unavailable("generation gate closed".to_string()))
            .map_err(FusionError::Model)?;

        let generated = self.model.generate(&prompt, &melody, &self.params).await?;

        debug!(
            "Generated {:.2}s of audio at {} Hz",
            generated.duration_seconds(),
            generated.sample_rate
        );

        Ok(generated)
    }
}

/// Style analysis + melody normalization, entirely on the caller's thread.
///
/// Both uploads are spilled to named temp files whose guards live to the
/// end of this function, so cleanup is guaranteed on every exit path.
fn prepare_inputs(
    melody_bytes: &[u8],
    style_bytes: &[u8],
    spill_dir: &Path,
) -> Result<(String, Waveform), FusionError> {
    let melody_file = spill_to_temp(melody_bytes, spill_dir)?;
    let style_file = spill_to_temp(style_bytes, spill_dir)?;

    // Style reference: first 10 seconds, mono
    let style = decode_file(style_file.path(), Some(STYLE_ANALYSIS_SECONDS))?.into_mono();

    let bpm = estimate_bpm(&style.samples, style.sample_rate)?;
    let centroid = mean_spectral_centroid(&style.samples, style.sample_rate)?;
    debug!(
        "Style features: {:.1} BPM, centroid {:.0} Hz over {:.2}s",
        bpm,
        centroid,
        style.duration_seconds()
    );

    let prompt = build_prompt(centroid, bpm);

    // Melody: mono at the model's input rate
    let melody = decode_file(melody_file.path(), None)?.into_mono();
    let melody = if melody.sample_rate != MODEL_INPUT_SAMPLE_RATE {
        resample_mono(&melody, MODEL_INPUT_SAMPLE_RATE)?
    } else {
        melody
    };

    Ok((prompt, melody))
}

/// Write bytes to a named temp file with a `.wav` suffix.
///
/// The returned guard deletes the file on drop.
fn spill_to_temp(bytes: &[u8], dir: &Path) -> Result<NamedTempFile, FusionError> {
    let mut file = tempfile::Builder::new()
        .prefix("fusion-")
        .suffix(".wav")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
