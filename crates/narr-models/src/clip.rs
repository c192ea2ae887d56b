//! Synthesized speech clips.

/// Synthesized audio for one cue.
///
/// The buffer holds encoded WAV bytes and is treated as opaque until the
/// track assembler decodes it. The measured duration drives gap computation,
/// so it must reflect the actual audio, not an estimate.
#[derive(Clone, PartialEq)]
pub struct Clip {
    /// Encoded WAV bytes.
    pub wav: Vec<u8>,
    /// Measured duration in seconds.
    pub duration_secs: f64,
}

impl Clip {
    pub fn new(wav: Vec<u8>, duration_secs: f64) -> Self {
        Self { wav, duration_secs }
    }
}

// Manual Debug: the audio buffer is noise in logs and test failures.
impl std::fmt::Debug for Clip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clip")
            .field("duration_secs", &self.duration_secs)
            .field("wav_bytes", &self.wav.len())
            .finish()
    }
}
