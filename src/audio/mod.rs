//! Audio decode, resample, and WAV encode support

pub mod loader;
pub mod resample;
pub mod wav;
pub mod waveform;

pub use loader::decode_file;
pub use resample::resample_mono;
pub use waveform::Waveform;
