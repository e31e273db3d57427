use crate::config::{non_empty, GenerationConfig};
use crate::error::ProviderError;
use crate::markup::normalize_markup;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "generation";

// Fixed sampling parameters sent with every prompt.
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1024;
const TOP_P: f32 = 0.9;
const TOP_K: u32 = 40;

/// Produces an answer for a free-form prompt.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Returns the normalized answer text, or a structured error. Failures
    /// are never folded into the returned string.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let detail = match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => format!("prompt blocked: {reason}"),
                None => "response contained no candidates".to_string(),
            };
            return Err(ProviderError::InvalidResponse {
                provider: PROVIDER,
                detail,
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(ProviderError::InvalidResponse {
                provider: PROVIDER,
                detail: format!("candidate has no text (finish reason: {reason})"),
            });
        }
        Ok(text)
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl GeminiClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::NotConfigured` when the API key is blank, or
    /// `ProviderError::Client` if the HTTP client cannot be constructed.
    pub fn new(config: GenerationConfig) -> Result<Self, ProviderError> {
        if non_empty(Some(&config.api_key)).is_none() {
            return Err(ProviderError::NotConfigured("generation API key"));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("hexa-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ProviderError::Client {
                provider: PROVIDER,
                source,
            })?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn request(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: prompt }],
            }],
            generation_config: GenerationParams {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        let secs = self.config.timeout_secs;
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key.trim())
            .json(&body)
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

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER,
                detail: e.to_string(),
            })?;
        parsed.into_text()
    }
}

#[async_trait]
impl AnswerProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        // Generation is billable and not idempotent: a single attempt only.
        let raw = RetryPolicy::none()
            .run(PROVIDER, move || self.request(prompt))
            .await?;
        tracing::debug!(model = %self.config.model, chars = raw.len(), "generation succeeded");
        Ok(normalize_markup(&raw))
    }
}
