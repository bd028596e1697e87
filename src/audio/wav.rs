//! In-memory WAV encode/decode
//!
//! The service never writes generated audio to disk: the response body and
//! the bridge wire format are both WAV byte buffers built over `Cursor`.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::Waveform;
use crate::error::FusionError;

/// Encode a waveform as 16-bit PCM WAV bytes
pub fn encode_wav(waveform: &Waveform) -> Result<Vec<u8>, FusionError> {
    let spec = WavSpec {
        channels: waveform.channels.max(1),
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| FusionError::Encode(e.to_string()))?;
        for &sample in &waveform.samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer
                .write_sample((clamped * i16::MAX as f32) as i16)
                .map_err(|e| FusionError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| FusionError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Decode WAV bytes into a waveform
///
/// Accepts 16/24/32-bit integer PCM and 32-bit float, the formats the
/// bridge is allowed to respond with.
pub fn decode_wav(bytes: &[u8]) -> Result<Waveform, FusionError> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| FusionError::Decode(e.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| FusionError::Decode(e.to_string()))?,
        (SampleFormat::Int, bits) if bits <= 32 => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| FusionError::Decode(e.to_string()))?
        }
        (format, bits) => {
            return Err(FusionError::Decode(format!(
                "unsupported WAV sample format: {:?}/{} bits",
                format, bits
            )))
        }
    };

    Ok(Waveform {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}
