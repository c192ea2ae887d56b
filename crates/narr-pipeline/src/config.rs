//! Pipeline configuration.

use std::path::PathBuf;

use narr_media::SilencePlacement;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Work directory for frames and per-cue clips
    pub work_dir: PathBuf,
    /// Directory the final track and narrated video are written to
    pub output_dir: PathBuf,
    /// Whether gap silence goes before or after each clip
    pub silence_placement: SilencePlacement,
    /// Keep the work directory after a successful run
    pub keep_work_dir: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/narrate"),
            output_dir: PathBuf::from("."),
            silence_placement: SilencePlacement::default(),
            keep_work_dir: false,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("NARRATE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("NARRATE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            silence_placement: std::env::var("NARRATE_SILENCE_PLACEMENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            keep_work_dir: std::env::var("NARRATE_KEEP_WORK")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Directory frames are sampled into.
    pub fn frames_dir(&self) -> PathBuf {
        self.work_dir.join("frames")
    }

    /// Directory per-cue clips are persisted into.
    pub fn clips_dir(&self) -> PathBuf {
        self.work_dir.join("narration")
    }
}
