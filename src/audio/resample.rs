//! Sample-rate conversion for the melody conditioning path
//!
//! The generative model requires 32 kHz mono input. Uploads arrive at
//! whatever rate the user recorded, so a melody at any other rate is
//! sinc-resampled before generation. A melody already at the target rate
//! is passed through untouched.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

use crate::audio::Waveform;
use crate::error::FusionError;

/// Resample a mono waveform to `target_rate`.
///
/// Single-pass: the chunk size equals the input length, so arbitrary
/// input lengths are handled without chunking bookkeeping.
///
/// - 256-tap sinc filter
/// - 0.95 cutoff to prevent aliasing
/// - BlackmanHarris2 window
pub fn resample_mono(waveform: &Waveform, target_rate: u32) -> Result<Waveform, FusionError> {
    debug_assert_eq!(waveform.channels, 1, "resample_mono expects mono input");

    if waveform.sample_rate == target_rate {
        return Ok(waveform.clone());
    }
    if waveform.samples.is_empty() {
        return Ok(Waveform::mono(Vec::new(), target_rate));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / waveform.sample_rate as f64;

    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        2.0, // max relative ratio (allows 2x up/down)
        params,
        waveform.samples.len(),
        1, // mono
    )
    .map_err(|e| FusionError::Resample(e.to_string()))?;

    let input = vec![waveform.samples.clone()];
    let mut output = resampler
        .process(&input, None)
        .map_err(|e| FusionError::Resample(e.to_string()))?;

    let resampled = output.swap_remove(0);
    debug!(
        "Resampled {} frames ({} Hz) -> {} frames ({} Hz)",
        waveform.samples.len(),
        waveform.sample_rate,
        resampled.len(),
        target_rate
    );

    Ok(Waveform::mono(resampled, target_rate))
}
