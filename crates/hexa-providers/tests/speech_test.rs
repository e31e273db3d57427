mod common;

use axum::{
    body::Body,
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures_util::{stream, StreamExt};
use hexa_providers::{ElevenLabsClient, ProviderError, SpeechConfig, SpeechSynthesizer};
use serde_json::Value;
use std::collections::HashMap;

fn client(base_url: String) -> ElevenLabsClient {
    ElevenLabsClient::new(SpeechConfig {
        api_key: Some("xi-test-key".to_string()),
        base_url,
        voice_id: "voice-123".to_string(),
        connect_timeout_secs: 2,
        response_timeout_secs: 5,
        ..SpeechConfig::default()
    })
    .unwrap()
}

async fn stream_audio(
    Path(voice): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("xi-api-key").and_then(|v| v.to_str().ok()) != Some("xi-test-key") {
        return (StatusCode::UNAUTHORIZED, "missing key").into_response();
    }
    assert_eq!(voice, "voice-123");
    assert_eq!(query.get("output_format").map(String::as_str), Some("mp3_44100_128"));
    assert_eq!(body["language_code"], "fr");

    let chunks = vec![
        Ok::<_, std::io::Error>(b"ID3".to_vec()),
        Ok(vec![0xFF, 0xFB, 0x90]),
        Ok(b"tail".to_vec()),
    ];
    Response::builder()
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .body(Body::from_stream(stream::iter(chunks)))
        .unwrap()
}

#[tokio::test]
async fn synthesize_streams_all_bytes() {
    let router = Router::new().route("/text-to-speech/{voice}/stream", post(stream_audio));
    let base = common::spawn_upstream(router).await;

    let mut audio = client(base).synthesize("bonjour", "fr").await.unwrap();
    let mut collected = Vec::new();
    while let Some(chunk) = audio.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }

    let mut expected = b"ID3".to_vec();
    expected.extend_from_slice(&[0xFF, 0xFB, 0x90]);
    expected.extend_from_slice(b"tail");
    assert_eq!(collected, expected);
}

#[tokio::test]
async fn upstream_rejection_surfaces_status_and_body() {
    let router = Router::new().route(
        "/text-to-speech/{voice}/stream",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                r#"{"detail":{"status":"invalid_api_key"}}"#,
            )
        }),
    );
    let base = common::spawn_upstream(router).await;

    let err = client(base).synthesize("hello", "en").await.err().unwrap();
    match err {
        ProviderError::Status { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"detail":{"status":"invalid_api_key"}}"#);
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_not_retried() {
    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/text-to-speech/{voice}/stream",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                (StatusCode::TOO_MANY_REQUESTS, "slow down")
            }
        }),
    );
    let base = common::spawn_upstream(router).await;

    let err = client(base).synthesize("hello", "en").await.err().unwrap();
    assert!(
        matches!(err, ProviderError::Status { status: 429, .. }),
        "got {err:?}"
    );
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn response_deadline_is_final_and_not_retried() {
    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/text-to-speech/{voice}/stream",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                (StatusCode::OK, "late")
            }
        }),
    );
    let base = common::spawn_upstream(router).await;

    let slow_client = ElevenLabsClient::new(SpeechConfig {
        api_key: Some("xi-test-key".to_string()),
        base_url: base,
        connect_timeout_secs: 2,
        response_timeout_secs: 1,
        ..SpeechConfig::default()
    })
    .unwrap();

    let err = slow_client.synthesize("hello", "en").await.err().unwrap();
    assert!(
        matches!(err, ProviderError::Timeout { secs: 1, .. }),
        "got {err:?}"
    );
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refused_connection_is_a_connect_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}"))
        .synthesize("hello", "en")
        .await
        .err()
        .unwrap();
    assert!(err.is_connect_failure(), "got {err:?}");
}
