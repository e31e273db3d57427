mod common;

use axum::http::{header, StatusCode};
use common::{assert_json, body_bytes, FakeSpeech, SpeechBehavior, TestAppBuilder};
use hexa_providers::{ElevenLabsClient, SpeechConfig};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn speak_streams_audio() {
    let app = TestAppBuilder::new().build();

    let response = app
        .post_json("/speak", json!({ "text": "Hola", "lang": "es" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(&body_bytes(response).await[..], b"ID3\xff\xfb");
}

#[tokio::test]
async fn lang_defaults_when_omitted() {
    let app = TestAppBuilder::new().build();

    let response = app.post_json("/speak", json!({ "text": "Hello" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.speech.calls(), 1);
}

#[tokio::test]
async fn upstream_rejection_surfaces_status_and_body() {
    let app = TestAppBuilder::new()
        .speech(FakeSpeech::new(SpeechBehavior::Rejected {
            status: 401,
            body: r#"{"detail":"invalid api key"}"#,
        }))
        .build();

    let json = assert_json(
        app.post_json("/speak", json!({ "text": "Hello" })).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;

    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Speech synthesis failed"), "got {detail}");
    assert!(detail.contains("401"), "got {detail}");
    assert!(detail.contains("invalid api key"), "got {detail}");
}

#[tokio::test]
async fn unconfigured_speech_is_unavailable_without_a_call() {
    let app = TestAppBuilder::new()
        .speech(FakeSpeech::new(SpeechBehavior::Unconfigured))
        .build();

    let json = assert_json(
        app.post_json("/speak", json!({ "text": "Hello" })).await,
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;

    assert_eq!(json["detail"], "speech service is not available");
    assert_eq!(app.speech.calls(), 0);
}

#[tokio::test]
async fn mid_stream_failure_truncates_body_after_headers() {
    let app = TestAppBuilder::new()
        .speech(FakeSpeech::new(SpeechBehavior::BreaksMidStream(b"ID3")))
        .build();

    let response = app.post_json("/speak", json!({ "text": "Hello" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await;
    assert!(body.is_err());
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_network_call() {
    let client = ElevenLabsClient::new(SpeechConfig {
        api_key: Some("test-key".to_string()),
        // Nothing listens here; reaching the network would fail with 500.
        base_url: "http://127.0.0.1:9".to_string(),
        ..SpeechConfig::default()
    })
    .unwrap();
    let app = TestAppBuilder::new().build_with_speech(Arc::new(client));

    let json = assert_json(
        app.post_json("/speak", json!({ "text": "   " })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(json["detail"].as_str().unwrap().contains("invalid input"));
}

#[tokio::test]
async fn speech_does_not_touch_history() {
    let app = TestAppBuilder::new().build();

    body_bytes(app.post_json("/speak", json!({ "text": "Hello" })).await).await;

    assert!(app.recent.is_empty());
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}
