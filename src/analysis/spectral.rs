//! Spectral centroid computation
//!
//! The centroid is the magnitude-weighted mean frequency of the spectrum,
//! a standard brightness indicator. Computed per Hann-windowed FFT frame
//! and averaged across frames, yielding a value in Hz.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::FusionError;

/// FFT frame length
const FFT_SIZE: usize = 2048;
/// Hop between successive frames
const HOP_SIZE: usize = 1024;
/// Magnitude floor below which a frame is treated as silent
const SILENCE_EPS: f32 = 1e-6;

/// Mean spectral centroid in Hz over mono samples.
///
/// Returns a feature error for audio too short to fill a single analysis
/// frame or with no measurable spectral energy.
pub fn mean_spectral_centroid(samples: &[f32], sample_rate: u32) -> Result<f64, FusionError> {
    if samples.len() < FFT_SIZE {
        return Err(FusionError::Feature(format!(
            "audio too short for spectral analysis: {} samples",
            samples.len()
        )));
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);

    let hann: Vec<f32> = (0..FFT_SIZE)
        .map(|i| {
            let phase = std::f32::consts::PI * i as f32 / (FFT_SIZE - 1) as f32;
            phase.sin() * phase.sin()
        })
        .collect();

    let bin_hz = sample_rate as f64 / FFT_SIZE as f64;

    let mut centroid_sum = 0.0f64;
    let mut frame_count = 0usize;
    let mut buffer = vec![Complex::new(0.0f32, 0.0f32); FFT_SIZE];

    for frame in samples.windows(FFT_SIZE).step_by(HOP_SIZE) {
        for (slot, (&s, &w)) in buffer.iter_mut().zip(frame.iter().zip(hann.iter())) {
            *slot = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buffer);

        let mut weighted = 0.0f64;
        let mut total = 0.0f64;
        // Skip bin 0 (DC) and the upper half (mirrored)
        for (k, bin) in buffer.iter().enumerate().take(FFT_SIZE / 2).skip(1) {
            let mag = bin.norm() as f64;
            weighted += k as f64 * bin_hz * mag;
            total += mag;
        }

        if total > SILENCE_EPS as f64 {
            centroid_sum += weighted / total;
            frame_count += 1;
        }
    }

    if frame_count == 0 {
        return Err(FusionError::Feature(
            "no measurable spectral energy (silent input?)".to_string(),
        ));
    }

    Ok(centroid_sum / frame_count as f64)
}
