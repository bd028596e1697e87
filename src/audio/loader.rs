//! Audio file decoding via symphonia
//!
//! Decodes an uploaded file (WAV primarily, plus MP3/FLAC/Vorbis since the
//! probe accepts them) into interleaved f32 PCM at the file's native rate
//! and channel count. An optional duration cap stops decoding early so the
//! style reference only pays for its first few seconds.

use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::audio::Waveform;
use crate::error::FusionError;

/// Decode an audio file into PCM, optionally capped at `max_seconds`.
pub fn decode_file(path: &Path, max_seconds: Option<f64>) -> Result<Waveform, FusionError> {
    let file = std::fs::File::open(path).map_err(FusionError::Io)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FusionError::Decode(format!("failed to probe audio format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| FusionError::Decode("no audio tracks found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| FusionError::Decode("sample rate not specified".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| FusionError::Decode(format!("failed to create decoder: {}", e)))?;

    let max_frames = max_seconds.map(|s| (s * sample_rate as f64).round() as usize);

    let mut samples: Vec<f32> = Vec::new();
    let mut channels: u16 = 0;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(FusionError::Decode(format!("failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| FusionError::Decode(format!("failed to decode packet: {}", e)))?;

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            channels = spec.channels.count() as u16;
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }

        if let Some(buf) = sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }

        if let Some(max) = max_frames {
            if channels > 0 && samples.len() / channels as usize >= max {
                break;
            }
        }
    }

    if channels == 0 || samples.is_empty() {
        return Err(FusionError::Decode(
            "no decodable audio data in file".to_string(),
        ));
    }

    // The last packet may overshoot the cap
    if let Some(max) = max_frames {
        samples.truncate(max * channels as usize);
    }

    debug!(
        "Decoded {} frames, {} ch @ {} Hz from {}",
        samples.len() / channels as usize,
        channels,
        sample_rate,
        path.display()
    );

    Ok(Waveform {
        samples,
        sample_rate,
        channels,
    })
}
