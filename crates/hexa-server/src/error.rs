//! Caller-facing error type for gateway operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hexa_providers::ProviderError;
use thiserror::Error;

/// Failures reported to HTTP callers.
///
/// History store failures have no variant here: they are absorbed by the
/// gateway and never reach a caller.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The generation provider failed. Never retried.
    #[error("Error generating response: {0}")]
    UpstreamGeneration(ProviderError),

    #[error("Translation failed: {0}")]
    UpstreamTranslation(ProviderError),

    /// Carries the upstream status and body when the provider rejected the
    /// request.
    #[error("Speech synthesis failed: {0}")]
    UpstreamSpeech(ProviderError),

    /// An optional provider is not configured.
    #[error("{0} service is not available")]
    ServiceUnavailable(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("page rendering failed: {0}")]
    Render(#[from] minijinja::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamGeneration(_)
            | Self::UpstreamTranslation(_)
            | Self::UpstreamSpeech(_)
            | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = Json(serde_json::json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}
