//! Structured run logging.
//!
//! Every event of a narration run carries the run id and cue context so a
//! single grep reconstructs what happened to each cue.

use tracing::{info, warn};

use narr_models::{format_seconds, Overlap};

use crate::report::{CueStage, RunReport};

/// Logger for one narration run.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
}

impl RunLogger {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn started(&self, video: &std::path::Path, cues: usize) {
        info!(
            run_id = %self.run_id,
            video = %video.display(),
            cues,
            "Narration run started"
        );
    }

    pub fn cue_narrated(&self, cue_index: usize, timestamp_secs: f64, gap_secs: f64, clip_secs: f64) {
        info!(
            run_id = %self.run_id,
            cue_index,
            timestamp = %format_seconds(timestamp_secs),
            gap_secs,
            clip_secs,
            "Cue narrated"
        );
    }

    pub fn cue_skipped(&self, cue_index: usize, timestamp_secs: f64, stage: CueStage, reason: &str) {
        warn!(
            run_id = %self.run_id,
            cue_index,
            timestamp = %format_seconds(timestamp_secs),
            stage = %stage,
            reason,
            "Cue skipped"
        );
    }

    pub fn overlap(&self, overlap: &Overlap) {
        warn!(
            run_id = %self.run_id,
            cue_index = overlap.cue_index,
            overrun_secs = overlap.overrun_secs,
            "Narration overlap: previous clip ran past this cue"
        );
    }

    pub fn completed(&self, report: &RunReport) {
        info!(
            run_id = %self.run_id,
            narrated_video = %report.narrated_video.display(),
            track = %report.track_path.display(),
            track_secs = report.track_duration_secs,
            narrated = report.cues_narrated,
            skipped = report.skipped.len(),
            overlaps = report.overlaps.len(),
            "Narration run completed"
        );
    }
}

impl Default for RunLogger {
    fn default() -> Self {
        Self::new()
    }
}
