//! The narration pipeline.
//!
//! Cues are processed strictly in timeline order: each description call
//! receives the script narrated so far, so cue `i+1` cannot start before cue
//! `i` has finished. Per-cue failures drop that cue and move on; only
//! assembly and muxing failures abort the run.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use narr_ai::{DescriptionClient, SpeechClient};
use narr_media::{
    assemble_track, mux_narration, prepare_frames_dir, probe_video, sample_frame,
};
use narr_models::{Cue, NarrationScheduler, Timeline};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::report::{CueStage, RunReport, SkippedCue};

/// Drives one video through sampling, description, synthesis, scheduling,
/// assembly and muxing.
pub struct NarrationPipeline {
    config: PipelineConfig,
    vision: DescriptionClient,
    speech: SpeechClient,
}

impl NarrationPipeline {
    pub fn new(
        config: PipelineConfig,
        vision: DescriptionClient,
        speech: SpeechClient,
    ) -> Self {
        Self {
            config,
            vision,
            speech,
        }
    }

    /// Create a pipeline with both clients configured from the environment.
    pub fn from_env(config: PipelineConfig) -> PipelineResult<Self> {
        Ok(Self::new(
            config,
            DescriptionClient::from_env()?,
            SpeechClient::from_env()?,
        ))
    }

    /// Narrate `video` at the timeline's cue timestamps.
    pub async fn run(&self, video: &Path, timeline: &Timeline) -> PipelineResult<RunReport> {
        let logger = RunLogger::new();
        logger.started(video, timeline.len());

        let info = probe_video(video).await?;
        timeline.ensure_within(info.duration)?;

        let frames_dir = self.config.frames_dir();
        let clips_dir = self.config.clips_dir();
        prepare_frames_dir(&frames_dir).await?;
        fs::create_dir_all(&clips_dir).await?;
        fs::create_dir_all(&self.config.output_dir).await?;

        let mut scheduler = NarrationScheduler::new();
        let mut script: Vec<Cue> = Vec::new();
        let mut skipped: Vec<SkippedCue> = Vec::new();

        for (index, timestamp) in timeline.iter() {
            let mut skip = |stage: CueStage, reason: String| {
                logger.cue_skipped(index, timestamp, stage, &reason);
                skipped.push(SkippedCue {
                    cue_index: index,
                    timestamp_secs: timestamp,
                    stage,
                    reason,
                });
            };

            let frame = match sample_frame(video, index, timestamp, &frames_dir).await {
                Ok(frame) => frame,
                Err(e) => {
                    skip(CueStage::Frame, e.to_string());
                    continue;
                }
            };

            let text = match self.vision.describe(&script, &frame).await {
                Ok(text) => text,
                Err(e) => {
                    skip(CueStage::Describe, e.to_string());
                    continue;
                }
            };

            let clip = match self.speech.synthesize(&text).await {
                Ok(clip) => clip,
                Err(e) => {
                    skip(CueStage::Synthesize, e.to_string());
                    continue;
                }
            };

            // Keep the raw clip around for inspection and reuse.
            let clip_path = clips_dir.join(format!("cue_{:04}.wav", index));
            fs::write(&clip_path, &clip.wav).await?;

            let clip_secs = clip.duration_secs;
            let gap = scheduler.place(index, timestamp, clip);
            logger.cue_narrated(index, timestamp, gap, clip_secs);
            script.push(Cue::new(index, timestamp, text));
        }

        let schedule = scheduler.into_schedule();
        for overlap in &schedule.overlaps {
            logger.overlap(overlap);
        }
        if schedule.is_empty() {
            return Err(PipelineError::AllCuesSkipped {
                skipped: skipped.len(),
                total: timeline.len(),
            });
        }

        let track = assemble_track(&schedule, self.config.silence_placement)?;

        let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let stem = video
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video");
        let track_path = self
            .config
            .output_dir
            .join(format!("{stem}-narration-{stamp}.wav"));
        let narrated_video = self
            .config
            .output_dir
            .join(format!("{stem}-narrated-{stamp}.mp4"));

        track.write_wav(&track_path)?;
        mux_narration(video, &track_path, &narrated_video).await?;

        if !self.config.keep_work_dir {
            if let Err(e) = fs::remove_dir_all(&self.config.work_dir).await {
                warn!("Failed to clean work dir: {}", e);
            }
        }

        let report = RunReport {
            run_id: logger.run_id().to_string(),
            source_video: video.to_path_buf(),
            narrated_video,
            track_path,
            track_duration_secs: track.duration_secs(),
            cues_total: timeline.len(),
            cues_narrated: schedule.len(),
            skipped,
            overlaps: schedule.overlaps.clone(),
        };
        self.write_report(&report).await?;
        logger.completed(&report);
        Ok(report)
    }

    /// Persist the run report next to the artifacts.
    async fn write_report(&self, report: &RunReport) -> PipelineResult<PathBuf> {
        let path = self
            .config
            .output_dir
            .join(format!("narration-report-{}.json", report.run_id));
        let json = serde_json::to_vec_pretty(report)?;
        fs::write(&path, json).await?;
        Ok(path)
    }
}
