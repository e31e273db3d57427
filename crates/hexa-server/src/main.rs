//! Hexa server binary.
//!
//! Loads configuration, prepares the history database, builds the provider
//! clients and serves the HTTP API with graceful shutdown on SIGTERM/SIGINT.

use hexa_db::HistoryStore;
use hexa_providers::{ElevenLabsClient, GeminiClient, GoogleTranslateClient};
use hexa_server::{
    app,
    config::{self, Config},
    gateway::{Gateway, Providers},
    pages::Pages,
    recent::RecentQueries,
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("HEXA_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_providers(config: &Config) -> Providers {
    let answers = GeminiClient::new(config.generation.clone())
        .expect("failed to build generation client, check [generation] settings");
    let translator = GoogleTranslateClient::new(config.translation.clone())
        .expect("failed to build translation client");
    let speech =
        ElevenLabsClient::new(config.speech.clone()).expect("failed to build speech client");

    Providers {
        answers: Arc::new(answers),
        translator: Arc::new(translator),
        speech: Arc::new(speech),
    }
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration, the server cannot start without valid config");

    init_tracing(&config);

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    // Initialize database
    let pool = hexa_db::create_pool(&config.database.path, config.database.runtime_settings())
        .expect("failed to create database pool, check database.path in config");

    {
        let conn = pool
            .get()
            .expect("failed to get database connection for migrations");
        let applied = hexa_db::run_migrations(&conn).expect("failed to run database migrations");
        if applied > 0 {
            tracing::info!(count = applied, "applied database migrations");
        }
    }

    let providers = build_providers(&config);
    let gateway = Arc::new(Gateway::new(
        providers,
        HistoryStore::new(pool),
        RecentQueries::new(config.history.recent_capacity),
    ));

    tracing::info!(
        translation = gateway.translation_available(),
        speech = gateway.speech_available(),
        "optional providers"
    );

    if config.startup.warm_up {
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move { gateway.warm_up().await });
    }

    let pages = Pages::new().expect("failed to compile page templates");
    let state = AppState {
        gateway,
        pages: Arc::new(pages),
        history_page_limit: config.history.page_limit,
    };

    let addr = SocketAddr::new(config.server.host, config.server.port);
    tracing::info!(%addr, "starting hexa server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address, is another process using this port?");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("hexa server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
