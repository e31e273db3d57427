use thiserror::Error;

/// Uniform failure type for every provider client.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("failed to build {provider} HTTP client: {source}")]
    Client {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("{provider} request timed out after {secs} seconds")]
    Timeout { provider: &'static str, secs: u64 },

    /// The provider answered with a non-success status. `body` is the
    /// upstream response body, verbatim.
    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unexpected response: {detail}")]
    InvalidResponse {
        provider: &'static str,
        detail: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ProviderError {
    pub(crate) fn from_reqwest(provider: &'static str, secs: u64, source: reqwest::Error) -> Self {
        // A connect timeout stays a transport error so it remains
        // distinguishable from a timeout on a request the provider received.
        if source.is_timeout() && !source.is_connect() {
            Self::Timeout { provider, secs }
        } else {
            Self::Transport { provider, source }
        }
    }

    /// Whether the request failed before reaching the provider.
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_connect())
    }

    /// Whether repeating the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport { source, .. } => source.is_connect() || source.is_timeout(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
