//! Prompt synthesis from extracted style features
//!
//! Two scalar features drive the text conditioning: the mean spectral
//! centroid picks a timbre descriptor, and the tempo estimate is embedded
//! as a whole BPM figure. The threshold and template are fixed policy,
//! not calibrated values.

/// Centroid threshold (Hz) separating the two timbre descriptors
pub const VIBE_CENTROID_THRESHOLD_HZ: f64 = 2500.0;

/// Descriptor for bright, synthetic-sounding style references
pub const VIBE_ELECTRONIC: &str = "electronic and synth-heavy";
/// Descriptor for darker, natural-sounding style references
pub const VIBE_ORGANIC: &str = "organic and acoustic";

/// Pick the timbre descriptor for a mean spectral centroid in Hz
pub fn classify_vibe(mean_centroid_hz: f64) -> &'static str {
    if mean_centroid_hz > VIBE_CENTROID_THRESHOLD_HZ {
        VIBE_ELECTRONIC
    } else {
        VIBE_ORGANIC
    }
}

/// Build the generation prompt from the style features.
///
/// The tempo is integer-truncated, matching the template's whole-BPM
/// phrasing.
pub fn build_prompt(mean_centroid_hz: f64, bpm: f64) -> String {
    let vibe = classify_vibe(mean_centroid_hz);
    format!(
        "A {} version of the uploaded melody. {} BPM, high-fidelity studio recording, signature professional instruments.",
        vibe, bpm as i64
    )
}
