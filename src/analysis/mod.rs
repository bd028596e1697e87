//! Style-reference feature extraction and prompt synthesis

pub mod prompt;
pub mod spectral;
pub mod tempo;

pub use prompt::{build_prompt, classify_vibe};
pub use spectral::mean_spectral_centroid;
pub use tempo::estimate_bpm;
