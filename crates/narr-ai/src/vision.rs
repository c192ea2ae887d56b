//! Frame description client.

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{AiError, AiResult};
use crate::types::{
    ChatContent, ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl,
};
use narr_models::Cue;

/// Default narrator persona for the system prompt.
const DEFAULT_PERSONA: &str = "You are the narrator of a nature documentary, \
observing the scene in each frame. Keep every line under 30 words, build on \
what you said before without repeating yourself, and if a frame is blurry or \
unclear, admit you are not sure what is happening.";

/// Instruction attached to each frame.
const DESCRIBE_PROMPT: &str = "Describe this frame.";

/// Configuration for the description client.
#[derive(Debug, Clone)]
pub struct DescriptionConfig {
    /// Base URL of the chat-completions service
    pub base_url: String,
    /// API key (bearer token)
    pub api_key: String,
    /// Model name
    pub model: String,
    /// System prompt establishing the narrator's voice
    pub persona: String,
    /// Token cap per description
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Max transport-level retries
    pub max_retries: u32,
}

impl DescriptionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> AiResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AiError::config("OPENAI_API_KEY not set"))?;
        Ok(Self {
            base_url: std::env::var("NARRATE_VISION_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            api_key,
            model: std::env::var("NARRATE_VISION_MODEL")
                .unwrap_or_else(|_| "gpt-4o".to_string()),
            persona: std::env::var("NARRATE_PERSONA")
                .unwrap_or_else(|_| DEFAULT_PERSONA.to_string()),
            max_tokens: 500,
            timeout: Duration::from_secs(
                std::env::var("NARRATE_VISION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("NARRATE_VISION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

/// Client for the frame description service.
pub struct DescriptionClient {
    http: Client,
    config: DescriptionConfig,
}

impl DescriptionClient {
    /// Create a new description client.
    pub fn new(config: DescriptionConfig) -> AiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AiError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> AiResult<Self> {
        Self::new(DescriptionConfig::from_env()?)
    }

    /// Describe the frame at `frame_path`.
    ///
    /// `script` is the ordered list of cues narrated so far; it is replayed
    /// as prior assistant turns so the narration stays coherent across cues.
    pub async fn describe(&self, script: &[Cue], frame_path: &Path) -> AiResult<String> {
        let image = tokio::fs::read(frame_path).await?;
        let data_url = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&image)
        );

        let mut messages = Vec::with_capacity(script.len() + 2);
        messages.push(ChatMessage {
            role: "system",
            content: ChatContent::Text(self.config.persona.clone()),
        });
        for cue in script {
            messages.push(ChatMessage {
                role: "assistant",
                content: ChatContent::Text(cue.text.clone()),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: ChatContent::Parts(vec![
                ContentPart::Text {
                    text: DESCRIBE_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ]),
        });

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        debug!("Requesting description from {}", url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(AiError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::provider(format!(
                "description service returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AiError::provider("empty description"));
        }
        Ok(text.to_string())
    }

    /// Execute with retry on transport errors.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> AiResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AiResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Description request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AiError::provider("unknown error")))
    }
}
