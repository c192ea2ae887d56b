//! Shared data models for the narration pipeline.
//!
//! This crate provides:
//! - Cue timelines with validation and timestamp parsing
//! - Cue, Clip and Schedule types
//! - The narration scheduler (gap computation and overlap detection)
//! - Encoding constants shared by the media wrappers

pub mod clip;
pub mod cue;
pub mod encoding;
pub mod schedule;
pub mod timeline;
pub mod timestamp;

// Re-export common types
pub use clip::Clip;
pub use cue::Cue;
pub use schedule::{NarrationScheduler, Overlap, Schedule, ScheduleEntry};
pub use timeline::{Timeline, TimelineError};
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
