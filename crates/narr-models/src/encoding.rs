//! Encoding constants shared by the media wrappers and the synthesis client.

/// Width frames are scaled to before being sent to the vision API.
pub const FRAME_SCALE_WIDTH: u32 = 768;

/// JPEG quality for sampled frames (FFmpeg `-q:v`, lower is better).
pub const FRAME_JPEG_QUALITY: u32 = 2;

/// PCM sample rate requested from the speech synthesizer.
pub const SYNTH_SAMPLE_RATE: u32 = 22_050;

/// Audio codec used when muxing the narration track onto the video.
pub const MUX_AUDIO_CODEC: &str = "aac";

/// Audio bitrate for the muxed narration track.
pub const MUX_AUDIO_BITRATE: &str = "192k";
