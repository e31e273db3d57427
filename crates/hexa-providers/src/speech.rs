use crate::config::{non_empty, SpeechConfig};
use crate::error::ProviderError;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use serde::Serialize;
use std::time::Duration;

const PROVIDER: &str = "speech";

/// Maximum text input accepted for synthesis, in characters.
pub const MAX_SPEECH_INPUT_CHARS: usize = 5_000;

// Fixed synthesis quality settings.
const STABILITY: f32 = 0.5;
const SIMILARITY_BOOST: f32 = 0.75;
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// Incrementally delivered MP3 audio.
///
/// Dropping the stream drops the underlying HTTP response, which aborts
/// the upstream transfer.
pub type AudioStream = BoxStream<'static, Result<Bytes, ProviderError>>;

/// Renders text to speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether the provider is configured. Callers check this before
    /// invoking [`SpeechSynthesizer::synthesize`].
    fn is_available(&self) -> bool;

    /// Starts synthesis and returns the audio as it arrives.
    ///
    /// A non-success upstream status is returned as
    /// `ProviderError::Status` carrying the upstream status and body.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioStream, ProviderError>;
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// Client for the ElevenLabs streaming text-to-speech endpoint.
#[derive(Clone)]
pub struct ElevenLabsClient {
    http: reqwest::Client,
    api_key: Option<String>,
    config: SpeechConfig,
}

impl std::fmt::Debug for ElevenLabsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsClient")
            .field("configured", &self.api_key.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ElevenLabsClient {
    /// # Errors
    ///
    /// Returns `ProviderError::Client` if the HTTP client cannot be built.
    pub fn new(config: SpeechConfig) -> Result<Self, ProviderError> {
        // No whole-request timeout: it would cut off long audio streams.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!("hexa-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ProviderError::Client {
                provider: PROVIDER,
                source,
            })?;
        let api_key = non_empty(config.api_key.as_deref()).map(str::to_string);
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/text-to-speech/{}/stream",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }

    async fn open(
        &self,
        api_key: &str,
        text: &str,
        lang: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        let body = SynthesisBody {
            text,
            model_id: &self.config.model_id,
            language_code: non_empty(Some(lang)),
            voice_settings: VoiceSettings {
                stability: STABILITY,
                similarity_boost: SIMILARITY_BOOST,
            },
        };

        let secs = self.config.response_timeout_secs;
        let send = self
            .http
            .post(self.endpoint())
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send();

        tokio::time::timeout(Duration::from_secs(secs), send)
            .await
            .map_err(|_| ProviderError::Timeout {
                provider: PROVIDER,
                secs,
            })?
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, secs, e))
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioStream, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("speech"))?;

        if text.trim().is_empty() {
            return Err(ProviderError::InvalidInput("text must not be empty".to_string()));
        }
        let chars = text.chars().count();
        if chars > MAX_SPEECH_INPUT_CHARS {
            return Err(ProviderError::InvalidInput(format!(
                "text exceeds maximum length: {chars} characters (limit: {MAX_SPEECH_INPUT_CHARS})"
            )));
        }

        // Only a failed connection is retried; once the provider has
        // answered, its response is final.
        let response = RetryPolicy::connect_only(1)
            .run(PROVIDER, move || self.open(api_key, text, lang))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "speech provider rejected request");
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(voice = %self.config.voice_id, lang, "speech stream opened");
        Ok(response
            .bytes_stream()
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })
            .boxed())
    }
}
