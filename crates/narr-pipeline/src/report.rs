//! Run reporting.

use std::path::PathBuf;

use serde::Serialize;

use narr_models::Overlap;

/// Pipeline stage at which a cue was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueStage {
    Frame,
    Describe,
    Synthesize,
}

impl std::fmt::Display for CueStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CueStage::Frame => "frame sampling",
            CueStage::Describe => "description",
            CueStage::Synthesize => "synthesis",
        };
        f.write_str(name)
    }
}

/// A cue dropped from the schedule, with the reason it failed.
///
/// Dropping a cue shifts nothing: the remaining cues keep their original
/// timestamps and the next scheduled gap simply spans the hole.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedCue {
    pub cue_index: usize,
    pub timestamp_secs: f64,
    pub stage: CueStage,
    pub reason: String,
}

/// Summary of one narration run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub source_video: PathBuf,
    pub narrated_video: PathBuf,
    pub track_path: PathBuf,
    pub track_duration_secs: f64,
    pub cues_total: usize,
    pub cues_narrated: usize,
    pub skipped: Vec<SkippedCue>,
    pub overlaps: Vec<Overlap>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_cue_serialization() {
        let skipped = SkippedCue {
            cue_index: 2,
            timestamp_secs: 10.0,
            stage: CueStage::Synthesize,
            reason: "synthesis service returned 500".to_string(),
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["cue_index"], 2);
        assert_eq!(json["stage"], "synthesize");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(CueStage::Frame.to_string(), "frame sampling");
        assert_eq!(CueStage::Describe.to_string(), "description");
    }
}
