use serde::{Deserialize, Serialize};
use std::fmt;

fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generation_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    30
}

fn default_translation_base_url() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    10
}

fn default_translation_max_retries() -> u32 {
    1
}

fn default_speech_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_speech_voice_id() -> String {
    "21m00Tcm4TlvDq8Ty8Rz".to_string()
}

fn default_speech_model_id() -> String {
    "eleven_turbo_v2_5".to_string()
}

fn default_speech_connect_timeout_secs() -> u64 {
    10
}

fn default_speech_response_timeout_secs() -> u64 {
    30
}

/// Settings for the text-generation provider.
///
/// The API key is the one credential the gateway cannot run without.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_generation_base_url(),
            model: default_generation_model(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &redacted(Some(&self.api_key)))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Settings for the translation provider. Translation is disabled when
/// `api_key` is absent.
#[derive(Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_translation_base_url")]
    pub base_url: String,
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure. Translation is idempotent,
    /// but the value is capped at one by [`crate::RetryPolicy`].
    #[serde(default = "default_translation_max_retries")]
    pub max_retries: u32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_translation_base_url(),
            timeout_secs: default_translation_timeout_secs(),
            max_retries: default_translation_max_retries(),
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &redacted(self.api_key.as_deref()))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Settings for the speech provider. Speech is disabled when `api_key` is
/// absent.
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_speech_base_url")]
    pub base_url: String,
    #[serde(default = "default_speech_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_speech_model_id")]
    pub model_id: String,
    #[serde(default = "default_speech_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Time allowed until the upstream response headers arrive. The audio
    /// body itself is streamed without a total deadline.
    #[serde(default = "default_speech_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_speech_base_url(),
            voice_id: default_speech_voice_id(),
            model_id: default_speech_model_id(),
            connect_timeout_secs: default_speech_connect_timeout_secs(),
            response_timeout_secs: default_speech_response_timeout_secs(),
        }
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &redacted(self.api_key.as_deref()))
            .field("base_url", &self.base_url)
            .field("voice_id", &self.voice_id)
            .field("model_id", &self.model_id)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("response_timeout_secs", &self.response_timeout_secs)
            .finish()
    }
}

fn redacted(secret: Option<&str>) -> &'static str {
    match secret {
        Some(s) if !s.is_empty() => "[REDACTED]",
        _ => "<unset>",
    }
}

/// Treats blank strings as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
