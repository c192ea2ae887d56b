#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and track assembly for the narration pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with timeout support
//! - Frame sampling at cue timestamps
//! - FFprobe-based source inspection
//! - Assembly of the narration track from a schedule (silence + clips)
//! - Muxing the assembled track onto the source video

pub mod command;
pub mod error;
pub mod frames;
pub mod mux;
pub mod probe;
pub mod track;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use frames::{prepare_frames_dir, sample_frame};
pub use mux::mux_narration;
pub use probe::{get_duration, probe_video, VideoInfo};
pub use track::{assemble_track, AssembledTrack, SilencePlacement, TrackSpec};
