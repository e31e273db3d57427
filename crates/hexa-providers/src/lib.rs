//! Clients for the external services behind the Hexa gateway.
//!
//! Three providers are supported, each behind a trait so the gateway can be
//! exercised without network access:
//!
//! | Trait | Client | Service |
//! |-------|--------|---------|
//! | [`AnswerProvider`] | [`GeminiClient`] | Gemini `generateContent` |
//! | [`Translator`] | [`GoogleTranslateClient`] | Cloud Translation v2 |
//! | [`SpeechSynthesizer`] | [`ElevenLabsClient`] | ElevenLabs text-to-speech stream |
//!
//! Generation is mandatory. Translation and speech may be left unconfigured,
//! in which case their clients report `is_available() == false` and refuse
//! calls without touching the network.
//!
//! Every outbound request carries an explicit timeout. Only idempotent calls
//! are retried, at most once (see [`RetryPolicy`]).

pub mod config;
pub mod error;
pub mod generation;
pub mod markup;
pub mod retry;
pub mod speech;
pub mod translation;

pub use config::{GenerationConfig, SpeechConfig, TranslationConfig};
pub use error::ProviderError;
pub use generation::{AnswerProvider, GeminiClient};
pub use markup::normalize_markup;
pub use retry::RetryPolicy;
pub use speech::{AudioStream, ElevenLabsClient, SpeechSynthesizer, MAX_SPEECH_INPUT_CHARS};
pub use translation::{GoogleTranslateClient, Translator};
