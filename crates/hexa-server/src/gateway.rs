//! Request orchestration.
//!
//! [`Gateway`] owns the provider clients, the history store and the recent
//! query buffer, and implements every externally visible operation on top
//! of them. Each operation calls at most one provider, strictly in sequence,
//! and applies the degradation rules:
//!
//! - provider failures end the operation and are reported to the caller;
//! - unconfigured optional providers report "unavailable" without any
//!   network call;
//! - history store failures are logged and absorbed, never reported.

use crate::error::GatewayError;
use crate::recent::RecentQueries;
use hexa_db::HistoryStore;
use hexa_providers::{AnswerProvider, AudioStream, ProviderError, SpeechSynthesizer, Translator};
use hexa_types::PersistedHistory;
use std::sync::Arc;

/// Prompt used to wake the generation provider at startup.
const WARM_UP_PROMPT: &str = "Hello";

/// Upper bound on records returned by a single persisted history read.
pub const MAX_HISTORY_LIMIT: usize = 100;

/// The provider clients a [`Gateway`] delegates to.
#[derive(Clone)]
pub struct Providers {
    pub answers: Arc<dyn AnswerProvider>,
    pub translator: Arc<dyn Translator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

pub struct Gateway {
    providers: Providers,
    store: HistoryStore,
    recent: RecentQueries,
}

impl Gateway {
    pub fn new(providers: Providers, store: HistoryStore, recent: RecentQueries) -> Self {
        Self {
            providers,
            store,
            recent,
        }
    }

    pub fn translation_available(&self) -> bool {
        self.providers.translator.is_available()
    }

    pub fn speech_available(&self) -> bool {
        self.providers.speech.is_available()
    }

    /// Answers a question.
    ///
    /// On success the question is appended to the recent query buffer and
    /// the pair is written to the history store (best effort). On provider
    /// failure neither happens.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::UpstreamGeneration` if the provider fails.
    pub async fn ask(&self, question: &str) -> Result<String, GatewayError> {
        let answer = self
            .providers
            .answers
            .generate(question)
            .await
            .map_err(GatewayError::UpstreamGeneration)?;

        self.recent.push(question);

        match self.store.append(question, &answer).await {
            Ok(record) => tracing::debug!(id = record.id, "stored chat record"),
            Err(e) => tracing::warn!(error = %e, "failed to store chat record, answer still returned"),
        }

        Ok(answer)
    }

    /// Translates `text` into `target_lang`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::ServiceUnavailable` when no translation
    /// provider is configured, or `GatewayError::UpstreamTranslation` when
    /// the provider fails.
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String, GatewayError> {
        let translator = &self.providers.translator;
        if !translator.is_available() {
            return Err(GatewayError::ServiceUnavailable("translation"));
        }

        translator
            .translate(text, target_lang)
            .await
            .map_err(|e| match e {
                ProviderError::NotConfigured(_) => GatewayError::ServiceUnavailable("translation"),
                other => GatewayError::UpstreamTranslation(other),
            })
    }

    /// Starts speech synthesis and returns the audio stream for passthrough.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::ServiceUnavailable` when no speech provider is
    /// configured, `GatewayError::InvalidInput` for empty or oversized text,
    /// or `GatewayError::UpstreamSpeech` when the provider fails.
    pub async fn speak(&self, text: &str, lang: &str) -> Result<AudioStream, GatewayError> {
        let speech = &self.providers.speech;
        if !speech.is_available() {
            return Err(GatewayError::ServiceUnavailable("speech"));
        }

        speech.synthesize(text, lang).await.map_err(|e| match e {
            ProviderError::NotConfigured(_) => GatewayError::ServiceUnavailable("speech"),
            ProviderError::InvalidInput(msg) => GatewayError::InvalidInput(msg),
            other => GatewayError::UpstreamSpeech(other),
        })
    }

    /// Questions asked since process start, most recent first.
    pub fn recent_queries(&self) -> Vec<String> {
        self.recent.snapshot()
    }

    /// Reads up to `limit` stored records, most recent first.
    ///
    /// Never fails: a store outage yields [`PersistedHistory::unavailable`].
    pub async fn persisted_history(&self, limit: usize) -> PersistedHistory {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        match self.store.list_recent(limit).await {
            Ok(records) => PersistedHistory::available(records),
            Err(e) => {
                tracing::warn!(error = %e, "history store unavailable, returning degraded result");
                PersistedHistory::unavailable()
            }
        }
    }

    /// Sends one throwaway prompt so the first real request does not pay the
    /// provider's cold-start latency. Nothing is recorded.
    pub async fn warm_up(&self) {
        match self.providers.answers.generate(WARM_UP_PROMPT).await {
            Ok(_) => tracing::info!("generation provider warmed up"),
            Err(e) => tracing::warn!(error = %e, "generation warm-up failed"),
        }
    }
}
