//! Narration pipeline driver.
//!
//! This crate provides:
//! - Pipeline configuration from environment variables
//! - The sequential per-cue loop (sample, describe, synthesize, schedule)
//! - Skipped-cue bookkeeping and the run report
//! - Structured run logging

pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod run;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use report::{CueStage, RunReport, SkippedCue};
pub use run::NarrationPipeline;
