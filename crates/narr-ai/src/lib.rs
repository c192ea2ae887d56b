//! HTTP clients for the narration pipeline's external AI services.
//!
//! This crate provides:
//! - `DescriptionClient`: frame description via an OpenAI-compatible
//!   chat-completions endpoint, with the running script as context
//! - `SpeechClient`: text-to-speech synthesis returning measured clips
//!
//! Both clients are thin request/response wrappers; bounded transport-level
//! retry lives here, never in the scheduling core.

pub mod error;
pub mod speech;
pub mod types;
pub mod vision;

pub use error::{AiError, AiResult};
pub use speech::{SpeechClient, SpeechConfig};
pub use vision::{DescriptionClient, DescriptionConfig};
