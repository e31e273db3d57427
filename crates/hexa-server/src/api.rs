//! JSON and audio API handlers.

use crate::{error::GatewayError, AppState};
use axum::{
    body::Body,
    extract::{Extension, Json, Query},
    http::header,
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use hexa_types::{
    AskQuery, AskResponse, HistoryQuery, PersistedHistory, RecentQueriesResponse, SpeakRequest,
    TranslateRequest, TranslateResponse,
};
use std::sync::Arc;

/// Handler for `GET /ask` and `GET /ask-gemini`.
pub async fn ask_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<AskQuery>,
) -> Result<Json<AskResponse>, GatewayError> {
    let answer = state.gateway.ask(&query.q).await?;
    Ok(Json(AskResponse { answer }))
}

/// Handler for `POST /translate`.
pub async fn translate_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, GatewayError> {
    let translated_text = state
        .gateway
        .translate(&payload.text, &payload.target_lang)
        .await?;
    Ok(Json(TranslateResponse { translated_text }))
}

/// Handler for `POST /speak`.
///
/// Audio is forwarded chunk by chunk as it arrives. Once the first byte has
/// been sent the status is committed, so a mid-stream upstream failure can
/// only be logged and end the body early.
pub async fn speak_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SpeakRequest>,
) -> Result<Response, GatewayError> {
    let audio = state.gateway.speak(&payload.text, &payload.lang).await?;
    let audio = audio.inspect_err(|e| {
        tracing::warn!(error = %e, "speech stream ended with an upstream error");
    });

    Ok((
        [(header::CONTENT_TYPE, "audio/mpeg")],
        Body::from_stream(audio),
    )
        .into_response())
}

/// Handler for `GET /history`.
pub async fn recent_queries_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<RecentQueriesResponse> {
    Json(RecentQueriesResponse {
        history: state.gateway.recent_queries(),
    })
}

/// Handler for `GET /db-history`. Always `200 OK`; a store outage is
/// reported in the body's `status` field.
pub async fn persisted_history_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<PersistedHistory> {
    let limit = query.limit.unwrap_or(state.history_page_limit);
    Json(state.gateway.persisted_history(limit).await)
}
