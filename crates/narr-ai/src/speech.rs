//! Speech synthesis client.

use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{AiError, AiResult};
use crate::types::SpeechRequest;
use narr_models::encoding::SYNTH_SAMPLE_RATE;
use narr_models::Clip;

/// Configuration for the speech client.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Base URL of the synthesis service
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Voice to synthesize with
    pub voice_id: String,
    /// Synthesis model
    pub model_id: String,
    /// PCM sample rate requested from the service
    pub sample_rate: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Max transport-level retries
    pub max_retries: u32,
}

impl SpeechConfig {
    /// Create config from environment variables.
    pub fn from_env() -> AiResult<Self> {
        let api_key = std::env::var("ELEVENLABS_API_KEY")
            .map_err(|_| AiError::config("ELEVENLABS_API_KEY not set"))?;
        let voice_id = std::env::var("ELEVENLABS_VOICE_ID")
            .map_err(|_| AiError::config("ELEVENLABS_VOICE_ID not set"))?;
        Ok(Self {
            base_url: std::env::var("NARRATE_SPEECH_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            api_key,
            voice_id,
            model_id: std::env::var("NARRATE_SPEECH_MODEL")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            sample_rate: std::env::var("NARRATE_SPEECH_SAMPLE_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SYNTH_SAMPLE_RATE),
            timeout: Duration::from_secs(
                std::env::var("NARRATE_SPEECH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("NARRATE_SPEECH_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

/// Client for the speech synthesis service.
pub struct SpeechClient {
    http: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    /// Create a new speech client.
    pub fn new(config: SpeechConfig) -> AiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AiError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> AiResult<Self> {
        Self::new(SpeechConfig::from_env()?)
    }

    /// Synthesize `text` into a measured clip.
    ///
    /// The service returns raw mono 16-bit PCM at the configured rate; it is
    /// wrapped into a WAV container here so the clip's duration is measured
    /// from the actual sample count, never estimated.
    pub async fn synthesize(&self, text: &str) -> AiResult<Clip> {
        let url = format!(
            "{}/v1/text-to-speech/{}?output_format=pcm_{}",
            self.config.base_url, self.config.voice_id, self.config.sample_rate
        );
        let request = SpeechRequest {
            text: text.to_string(),
            model_id: self.config.model_id.clone(),
        };

        debug!("Requesting synthesis of {} chars", text.len());

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .header("xi-api-key", &self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(AiError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::synthesis(format!(
                "synthesis service returned {}: {}",
                status, body
            )));
        }

        let pcm = response.bytes().await?;
        if pcm.is_empty() || pcm.len() % 2 != 0 {
            return Err(AiError::synthesis(format!(
                "malformed PCM payload ({} bytes)",
                pcm.len()
            )));
        }

        pcm_to_clip(&pcm, self.config.sample_rate)
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
                        "Synthesis request failed (attempt {}), retrying in {:?}: {}",
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

        Err(last_error.unwrap_or_else(|| AiError::synthesis("unknown error")))
    }
}

/// Wrap raw mono s16le PCM into a WAV clip with a measured duration.
fn pcm_to_clip(pcm: &[u8], sample_rate: u32) -> AiResult<Clip> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| AiError::synthesis(format!("encode WAV: {e}")))?;
        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .map_err(|e| AiError::synthesis(format!("encode WAV: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| AiError::synthesis(format!("encode WAV: {e}")))?;
    }

    let frames = (pcm.len() / 2) as f64;
    Ok(Clip::new(cursor.into_inner(), frames / sample_rate as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> SpeechConfig {
        SpeechConfig {
            base_url,
            api_key: "test-key".to_string(),
            voice_id: "test-voice".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            sample_rate: 22_050,
            timeout: Duration::from_secs(5),
            max_retries: 0,
        }
    }

    #[tokio::test]
    async fn test_synthesize_measures_duration() {
        let server = MockServer::start().await;
        // one second of silence at 22.05 kHz
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/test-voice"))
            .and(header("xi-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 44_100]))
            .mount(&server)
            .await;

        let client = SpeechClient::new(test_config(server.uri())).unwrap();
        let clip = client.synthesize("A fox pauses.").await.unwrap();

        assert!((clip.duration_secs - 1.0).abs() < 1e-9);

        let reader = hound::WavReader::new(Cursor::new(clip.wav.as_slice())).unwrap();
        assert_eq!(reader.spec().sample_rate, 22_050);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.duration(), 22_050);
    }

    #[tokio::test]
    async fn test_synthesize_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = SpeechClient::new(test_config(server.uri())).unwrap();
        let result = client.synthesize("text").await;
        assert!(matches!(result, Err(AiError::Synthesis(_))));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_odd_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 101]))
            .mount(&server)
            .await;

        let client = SpeechClient::new(test_config(server.uri())).unwrap();
        let result = client.synthesize("text").await;
        assert!(matches!(result, Err(AiError::Synthesis(_))));
    }

    #[test]
    fn test_pcm_to_clip_roundtrip() {
        let pcm: Vec<u8> = (0..100i16).flat_map(|s| s.to_le_bytes()).collect();
        let clip = pcm_to_clip(&pcm, 22_050).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(clip.wav.as_slice())).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, (0..100).collect::<Vec<i16>>());
        assert!((clip.duration_secs - 100.0 / 22_050.0).abs() < 1e-9);
    }
}
