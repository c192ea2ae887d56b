//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid timeline: {0}")]
    Timeline(#[from] narr_models::TimelineError),

    #[error("Media error: {0}")]
    Media(#[from] narr_media::MediaError),

    #[error("AI service error: {0}")]
    Ai(#[from] narr_ai::AiError),

    #[error("Every cue was skipped ({skipped} of {total}); nothing to narrate")]
    AllCuesSkipped { skipped: usize, total: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
