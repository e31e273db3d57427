//! Server configuration loading from file and environment variables.

use hexa_providers::{GenerationConfig, SpeechConfig, TranslationConfig};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Query history settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Startup behavior.
    #[serde(default)]
    pub startup: StartupConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,

    /// How long a request waits for a pooled connection, in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "hexa_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Query history configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of questions kept in the in-memory recent list.
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,

    /// Number of stored records shown on the history page and returned by
    /// `/db-history` when no limit is given.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

/// Startup configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartupConfig {
    /// Send one prompt to the generation provider after startup.
    #[serde(default)]
    pub warm_up: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "hexa.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_connection_timeout_ms() -> u64 {
    3_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recent_capacity() -> usize {
    100
}

fn default_page_limit() -> usize {
    hexa_types::DEFAULT_HISTORY_LIMIT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
            connection_timeout_ms: default_connection_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_capacity: default_recent_capacity(),
            page_limit: default_page_limit(),
        }
    }
}

impl DatabaseConfig {
    pub fn runtime_settings(&self) -> hexa_db::DbRuntimeSettings {
        hexa_db::DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
            connection_timeout_ms: self.connection_timeout_ms,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A credential the server cannot run without is missing.
    #[error("missing required credential: {0}")]
    MissingCredential(&'static str),

    /// A setting has a value the server cannot use.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl Config {
    /// Checks the settings the server cannot start without.
    ///
    /// Translation and speech credentials are optional: their absence only
    /// disables those features.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when the generation API key
    /// is blank, or `ConfigError::InvalidValue` for unusable sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                "generation.api_key (GEMINI_API_KEY)",
            ));
        }
        if self.history.recent_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.recent_capacity",
                reason: "must be at least 1",
            });
        }
        if self.database.pool_max_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.pool_max_size",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `HEXA_HOST` overrides `server.host`
/// - `HEXA_PORT` overrides `server.port`
/// - `HEXA_DB_PATH` (or `DATABASE_URL`, `sqlite:` prefix optional) overrides `database.path`
/// - `HEXA_LOG_LEVEL` overrides `logging.level`
/// - `HEXA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `HEXA_WARM_UP` overrides `startup.warm_up`
/// - `GEMINI_API_KEY` overrides `generation.api_key`
/// - `TRANSLATE_API_KEY` overrides `translation.api_key`
/// - `ELEVENLABS_API_KEY` overrides `speech.api_key`
/// - `ELEVENLABS_VOICE_ID` overrides `speech.voice_id`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(parsed) = var("HEXA_HOST").and_then(|h| h.parse().ok()) {
        config.server.host = parsed;
    }
    if let Some(parsed) = var("HEXA_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = parsed;
    }
    if let Some(url) = var("DATABASE_URL") {
        config.database.path = sqlite_path(&url).to_string();
    }
    if let Some(db_path) = var("HEXA_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(level) = var("HEXA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("HEXA_LOG_JSON") {
        config.logging.json = is_truthy(&json);
    }
    if let Some(warm_up) = var("HEXA_WARM_UP") {
        config.startup.warm_up = is_truthy(&warm_up);
    }
    if let Some(key) = var("GEMINI_API_KEY") {
        config.generation.api_key = key;
    }
    if let Some(key) = var("TRANSLATE_API_KEY") {
        config.translation.api_key = Some(key);
    }
    if let Some(key) = var("ELEVENLABS_API_KEY") {
        config.speech.api_key = Some(key);
    }
    if let Some(voice) = var("ELEVENLABS_VOICE_ID") {
        config.speech.voice_id = voice;
    }
}

fn is_truthy(value: &str) -> bool {
    value == "true" || value == "1"
}

fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}
