use crate::config::{non_empty, TranslationConfig};
use crate::error::ProviderError;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "translation";

/// Translates text into a target language, detecting the source language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Whether the provider is configured. Callers check this before
    /// invoking [`Translator::translate`].
    fn is_available(&self) -> bool;

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateEnvelope {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    detected_source_language: Option<String>,
}

/// Client for the Cloud Translation v2 REST API.
///
/// Constructed even when no API key is configured; in that case
/// [`Translator::is_available`] is false and every call fails with
/// `ProviderError::NotConfigured` before any request is made.
#[derive(Clone)]
pub struct GoogleTranslateClient {
    http: reqwest::Client,
    api_key: Option<String>,
    config: TranslationConfig,
}

impl std::fmt::Debug for GoogleTranslateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateClient")
            .field("configured", &self.api_key.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GoogleTranslateClient {
    /// # Errors
    ///
    /// Returns `ProviderError::Client` if the HTTP client cannot be built.
    pub fn new(config: TranslationConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
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

    async fn request(
        &self,
        api_key: &str,
        text: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let secs = self.config.timeout_secs;
        let response = self
            .http
            .post(&self.config.base_url)
            .header("x-goog-api-key", api_key)
            .json(&TranslateBody {
                q: text,
                target: target_lang,
                format: "text",
            })
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let envelope: TranslateEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                detail: e.to_string(),
            })?;

        let translation = envelope.data.translations.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse {
                provider: PROVIDER,
                detail: "response contained no translations".to_string(),
            }
        })?;

        tracing::debug!(
            target_lang,
            source_lang = translation.detected_source_language.as_deref().unwrap_or("?"),
            "translation succeeded"
        );
        Ok(translation.translated_text)
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured("translation"))?;

        RetryPolicy::idempotent(self.config.max_retries)
            .run(PROVIDER, move || self.request(api_key, text, target_lang))
            .await
    }
}
