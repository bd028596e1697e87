//! Shared fixtures for integration tests
#![allow(dead_code)] // each test binary uses a different subset

use fusion_engine::audio::{wav::encode_wav, Waveform};

/// Mono sine tone as WAV bytes
pub fn sine_wav(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<u8> {
    let samples = sine(frequency, duration_secs, sample_rate);
    encode_wav(&Waveform::mono(samples, sample_rate)).unwrap()
}

/// Stereo sine tone (inverted right channel) as WAV bytes
pub fn stereo_sine_wav(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<u8> {
    let mono = sine(frequency, duration_secs, sample_rate);
    let mut interleaved = Vec::with_capacity(mono.len() * 2);
    for &s in &mono {
        interleaved.push(s);
        interleaved.push(-s);
    }
    encode_wav(&Waveform {
        samples: interleaved,
        sample_rate,
        channels: 2,
    })
    .unwrap()
}

/// Style fixture: decaying tone bursts on a fixed beat grid.
///
/// The burst frequency sets the brightness (spectral centroid), the beat
/// grid sets the tempo the analyzer should recover.
pub fn click_style_wav(burst_hz: f32, bpm: f64, duration_secs: f64, sample_rate: u32) -> Vec<u8> {
    let num_samples = (duration_secs * sample_rate as f64) as usize;
    let beat_interval = (60.0 / bpm * sample_rate as f64) as usize;
    let burst_len = (sample_rate as f64 * 0.2) as usize;

    let mut samples = vec![0.0f32; num_samples];
    let mut pos = 0usize;
    while pos < num_samples {
        for i in 0..burst_len.min(num_samples - pos) {
            let t = i as f32 / sample_rate as f32;
            let envelope = (-t / 0.05).exp();
            samples[pos + i] +=
                (2.0 * std::f32::consts::PI * burst_hz * t).sin() * 0.8 * envelope;
        }
        pos += beat_interval;
    }

    encode_wav(&Waveform::mono(samples, sample_rate)).unwrap()
}

/// Parse the integer BPM figure out of a generated prompt
pub fn prompt_bpm(prompt: &str) -> i64 {
    prompt
        .split(" BPM")
        .next()
        .and_then(|head| head.split_whitespace().last())
        .and_then(|token| token.parse().ok())
        .unwrap_or_else(|| panic!("no BPM figure in prompt: {}", prompt))
}

fn sine(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5
        })
        .collect()
}
