//! Narration cues.

use serde::Serialize;

/// One timeline entry paired with the narration text generated for the frame
/// sampled there.
///
/// The ordered list of prior cues is the conversation context handed to each
/// description call, so consecutive descriptions build on each other instead
/// of repeating themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    /// 1-based position in the timeline.
    pub index: usize,
    /// Seconds into the source video.
    pub timestamp_secs: f64,
    /// Narration text produced by the description provider.
    pub text: String,
}

impl Cue {
    pub fn new(index: usize, timestamp_secs: f64, text: impl Into<String>) -> Self {
        Self {
            index,
            timestamp_secs,
            text: text.into(),
        }
    }
}
