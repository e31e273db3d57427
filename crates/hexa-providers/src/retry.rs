//! Bounded retry for outbound provider requests.

use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;

/// Hard ceiling on extra attempts, whatever the configuration says.
const MAX_RETRIES: u32 = 1;

/// Pause before the retry attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Which failures qualify for another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryOn {
    Nothing,
    /// The request never reached the provider.
    ConnectFailures,
    /// Connection failures, timeouts and 5xx responses.
    TransientFailures,
}

/// How many times a failed request may be repeated, and which failures
/// qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    retry_on: RetryOn,
}

impl RetryPolicy {
    /// Never retry. Used for billable, non-idempotent calls.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            retry_on: RetryOn::Nothing,
        }
    }

    /// Retry transport failures, timeouts and 5xx responses.
    pub fn idempotent(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.min(MAX_RETRIES),
            retry_on: RetryOn::TransientFailures,
        }
    }

    /// Retry only when the connection could not be established. A timeout
    /// waiting for the response is final: the provider may already be
    /// processing the request.
    pub fn connect_only(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.min(MAX_RETRIES),
            retry_on: RetryOn::ConnectFailures,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn should_retry(&self, err: &ProviderError) -> bool {
        match self.retry_on {
            RetryOn::Nothing => false,
            RetryOn::ConnectFailures => err.is_connect_failure(),
            RetryOn::TransientFailures => err.is_transient(),
        }
    }

    /// Runs `attempt` until it succeeds, fails permanently, or the retry
    /// budget is spent.
    pub async fn run<T, F, Fut>(
        &self,
        provider: &'static str,
        mut attempt: F,
    ) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut tries = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if tries < self.max_retries && self.should_retry(&err) => {
                    tries += 1;
                    tracing::warn!(
                        provider,
                        attempt = tries,
                        error = %err,
                        "retrying provider request"
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
