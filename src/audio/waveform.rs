//! PCM waveform container
//!
//! Holds decoded interleaved f32 samples with their sample rate and channel
//! count. Produced by the decoder, consumed by analysis and generation.

/// Decoded PCM audio with interleaved f32 samples, normalized to [-1.0, 1.0]
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Interleaved samples (frame-major: ch0, ch1, ..., ch0, ch1, ...)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl Waveform {
    /// Create a mono waveform from a flat sample buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }

    /// Collapse to a single channel by averaging across channels.
    ///
    /// A waveform that is already mono is returned unchanged (no copy of
    /// the sample memory beyond the move).
    pub fn into_mono(self) -> Waveform {
        if self.channels <= 1 {
            return Waveform {
                channels: 1,
                ..self
            };
        }

        let ch = self.channels as usize;
        let frames = self.samples.len() / ch;
        let mut mono = Vec::with_capacity(frames);
        for frame in self.samples.chunks_exact(ch) {
            let sum: f32 = frame.iter().sum();
            mono.push(sum / ch as f32);
        }

        Waveform::mono(mono, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_downmix_averages_channels() {
        // L = 0.8, R = 0.2 every frame -> mono = 0.5
        let wf = Waveform {
            samples: vec![0.8, 0.2, 0.8, 0.2, 0.8, 0.2],
            sample_rate: 44100,
            channels: 2,
        };

        let mono = wf.into_mono();
        assert_eq!(mono.channels, 1);
        assert_eq!(mono.samples.len(), 3);
        for &s in &mono.samples {
            assert!((s - 0.5).abs() < 1e-6, "expected 0.5, got {}", s);
        }
    }

    #[test]
    fn test_mono_passthrough() {
        let wf = Waveform::mono(vec![0.1, 0.2, 0.3], 32000);
        let samples_before = wf.samples.clone();
        let mono = wf.into_mono();
        assert_eq!(mono.channels, 1);
        assert_eq!(mono.samples, samples_before);
    }

    #[test]
    fn test_duration() {
        let wf = Waveform::mono(vec![0.0; 32000], 32000);
        assert!((wf.duration_seconds() - 1.0).abs() < 1e-9);

        let stereo = Waveform {
            samples: vec![0.0; 88200],
            sample_rate: 44100,
            channels: 2,
        };
        assert_eq!(stereo.frames(), 44100);
        assert!((stereo.duration_seconds() - 1.0).abs() < 1e-9);
    }
}
