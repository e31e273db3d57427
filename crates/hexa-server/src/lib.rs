//! Hexa server library logic.
//!
//! A thin HTTP gateway in front of three external providers (answer
//! generation, translation, speech synthesis) and a local history store.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod pages;
pub mod recent;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use gateway::Gateway;
use pages::Pages;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Provider clients, history store and recent queries.
    pub gateway: Arc<Gateway>,
    /// Compiled HTML templates.
    pub pages: Arc<Pages>,
    /// Default number of stored records shown per history read.
    pub history_page_limit: usize,
}

/// Maximum request body size (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_handler))
        .route("/history-page", get(pages::history_page_handler))
        .route("/health", get(health))
        .route("/favicon.ico", get(favicon))
        .route("/ask", get(api::ask_handler))
        .route("/ask-gemini", get(api::ask_handler))
        .route("/translate", post(api::translate_handler))
        .route("/speak", post(api::speak_handler))
        .route("/history", get(api::recent_queries_handler))
        .route("/db-history", get(api::persisted_history_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
