//! Shared types for the Hexa gateway.
//!
//! This crate holds the data model persisted by `hexa-db` and the JSON
//! bodies exchanged over the HTTP surface of `hexa-server`. It has no
//! dependencies beyond `serde`, so every other crate in the workspace can
//! depend on it without pulling in the database or HTTP stacks.

use serde::{Deserialize, Serialize};

/// Default number of records returned by persisted history reads.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Default language used for speech synthesis when the caller omits one.
pub const DEFAULT_SPEECH_LANG: &str = "en";

/// A persisted question/answer pair.
///
/// `id` and `created_at` are assigned by the store at insert time and are
/// never supplied by clients. Records are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Store-assigned identifier.
    pub id: i64,
    /// The question as received from the caller.
    pub question: String,
    /// The normalized answer returned to the caller.
    pub answer: String,
    /// Store-assigned insert timestamp (ISO 8601, UTC, millisecond precision).
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Availability marker for persisted history reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    /// The store answered the query.
    Ok,
    /// The store could not be reached; `history` is empty.
    Unavailable,
}

/// Result of a persisted history read.
///
/// Reads never fail from the caller's point of view: a store outage is
/// reported as [`HistoryStatus::Unavailable`] with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedHistory {
    pub status: HistoryStatus,
    pub history: Vec<ChatRecord>,
}

impl PersistedHistory {
    /// Wraps records returned by the store.
    pub fn available(history: Vec<ChatRecord>) -> Self {
        Self {
            status: HistoryStatus::Ok,
            history,
        }
    }

    /// The degraded result used when the store is down.
    pub fn unavailable() -> Self {
        Self {
            status: HistoryStatus::Unavailable,
            history: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == HistoryStatus::Ok
    }
}

/// Query string for `GET /ask`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuery {
    pub q: String,
}

/// Response body for `GET /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Request body for `POST /translate`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    /// Target language code understood by the translation provider.
    #[serde(rename = "targetLang", alias = "target_lang")]
    pub target_lang: String,
}

/// Response body for `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Request body for `POST /speak`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
    #[serde(default = "default_speech_lang")]
    pub lang: String,
}

fn default_speech_lang() -> String {
    DEFAULT_SPEECH_LANG.to_string()
}

/// Response body for `GET /history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentQueriesResponse {
    /// Questions asked since process start, most recent first.
    pub history: Vec<String>,
}

/// Query string for `GET /db-history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}
