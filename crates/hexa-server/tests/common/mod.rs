//! Shared fixtures: in-process provider fakes and app construction.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use hexa_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings, HistoryStore};
use hexa_providers::{AnswerProvider, AudioStream, ProviderError, SpeechSynthesizer, Translator};
use hexa_server::{
    app,
    gateway::{Gateway, Providers},
    pages::Pages,
    recent::RecentQueries,
    AppState,
};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub struct FakeAnswers {
    reply: Option<String>,
    calls: AtomicU32,
}

impl FakeAnswers {
    pub fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerProvider for FakeAnswers {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(ProviderError::Status {
            provider: "generation",
            status: 503,
            body: "model overloaded".to_string(),
        })
    }
}

pub struct FakeTranslator {
    available: bool,
    fails: bool,
    calls: AtomicU32,
}

impl FakeTranslator {
    pub fn available() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            fails: false,
            calls: AtomicU32::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            fails: true,
            calls: AtomicU32::new(0),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            fails: false,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            return Err(ProviderError::Status {
                provider: "translation",
                status: 502,
                body: "upstream gateway error".to_string(),
            });
        }
        Ok(format!("[{target_lang}] {text}"))
    }
}

pub enum SpeechBehavior {
    Unconfigured,
    Audio(Vec<&'static [u8]>),
    Rejected { status: u16, body: &'static str },
    BreaksMidStream(&'static [u8]),
}

pub struct FakeSpeech {
    behavior: SpeechBehavior,
    calls: AtomicU32,
}

impl FakeSpeech {
    pub fn new(behavior: SpeechBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    fn is_available(&self) -> bool {
        !matches!(self.behavior, SpeechBehavior::Unconfigured)
    }

    async fn synthesize(&self, _text: &str, _lang: &str) -> Result<AudioStream, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            SpeechBehavior::Unconfigured => Err(ProviderError::NotConfigured("speech API key")),
            SpeechBehavior::Audio(chunks) => {
                let items: Vec<Result<Bytes, ProviderError>> = chunks
                    .iter()
                    .map(|c| Ok(Bytes::from_static(*c)))
                    .collect();
                Ok(stream::iter(items).boxed())
            }
            SpeechBehavior::Rejected { status, body } => Err(ProviderError::Status {
                provider: "speech",
                status: *status,
                body: body.to_string(),
            }),
            SpeechBehavior::BreaksMidStream(first) => {
                let items = vec![
                    Ok(Bytes::from_static(*first)),
                    Err(ProviderError::InvalidResponse {
                        provider: "speech",
                        detail: "connection reset".to_string(),
                    }),
                ];
                Ok(stream::iter(items).boxed())
            }
        }
    }
}

/// History store backed by a single in-memory connection.
pub fn memory_store() -> HistoryStore {
    HistoryStore::new(memory_pool(500))
}

/// Migrated single-connection in-memory pool. Holding its connection
/// stalls every store operation for up to `connection_timeout_ms`.
pub fn memory_pool(connection_timeout_ms: u64) -> DbPool {
    let pool = create_pool(
        ":memory:",
        DbRuntimeSettings {
            pool_max_size: 1,
            connection_timeout_ms,
            ..DbRuntimeSettings::default()
        },
    )
    .unwrap();
    run_migrations(&pool.get().unwrap()).unwrap();
    pool
}

/// History store whose schema was never created, so every read and write
/// fails.
pub fn broken_store() -> HistoryStore {
    let pool = create_pool(
        ":memory:",
        DbRuntimeSettings {
            pool_max_size: 1,
            connection_timeout_ms: 500,
            ..DbRuntimeSettings::default()
        },
    )
    .unwrap();
    HistoryStore::new(pool)
}

pub struct TestApp {
    pub router: Router,
    pub store: HistoryStore,
    pub recent: RecentQueries,
    pub answers: Arc<FakeAnswers>,
    pub translator: Arc<FakeTranslator>,
    pub speech: Arc<FakeSpeech>,
}

pub struct TestAppBuilder {
    answers: Arc<FakeAnswers>,
    translator: Arc<FakeTranslator>,
    speech: Arc<FakeSpeech>,
    store: HistoryStore,
    recent_capacity: usize,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            answers: FakeAnswers::ok("Paris"),
            translator: FakeTranslator::available(),
            speech: FakeSpeech::new(SpeechBehavior::Audio(vec![&b"ID3"[..], &b"\xff\xfb"[..]])),
            store: memory_store(),
            recent_capacity: 100,
        }
    }

    pub fn answers(mut self, answers: Arc<FakeAnswers>) -> Self {
        self.answers = answers;
        self
    }

    pub fn translator(mut self, translator: Arc<FakeTranslator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn speech(mut self, speech: Arc<FakeSpeech>) -> Self {
        self.speech = speech;
        self
    }

    pub fn store(mut self, store: HistoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn recent_capacity(mut self, capacity: usize) -> Self {
        self.recent_capacity = capacity;
        self
    }

    pub fn build(self) -> TestApp {
        let speech = self.speech.clone();
        self.build_with_speech(speech)
    }

    /// Builds the app around a real or custom speech synthesizer.
    pub fn build_with_speech(self, speech: Arc<dyn SpeechSynthesizer>) -> TestApp {
        let recent = RecentQueries::new(self.recent_capacity);
        let providers = Providers {
            answers: self.answers.clone(),
            translator: self.translator.clone(),
            speech,
        };
        let gateway = Gateway::new(providers, self.store.clone(), recent.clone());
        let state = AppState {
            gateway: Arc::new(gateway),
            pages: Arc::new(Pages::new().unwrap()),
            history_page_limit: 10,
        };

        TestApp {
            router: app(state),
            store: self.store,
            recent,
            answers: self.answers,
            translator: self.translator,
            speech: self.speech,
        }
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn assert_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
