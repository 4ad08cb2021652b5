//! Server configuration loading from file and environment variables.
//!
//! The database location is special: deployment platforms inject it through
//! one of several environment variables, so it resolves through a fixed
//! priority chain (see [`resolve_database_path`]) instead of carrying a
//! baked-in default.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Environment variables that may carry the database location, in priority
/// order.
const DATABASE_ENV_VARS: [&str; 3] = ["TALLY_DATABASE_URL", "DATABASE_URL", "STORAGE_URL"];

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
    /// Path to the SQLite database file. No default: when the environment
    /// chain is empty and the config file does not set one, startup fails.
    #[serde(default)]
    pub path: Option<String>,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tally_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
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
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
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

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No database location anywhere in the chain.
    #[error(
        "no database location configured — set TALLY_DATABASE_URL, DATABASE_URL, or \
         STORAGE_URL, or database.path in the config file"
    )]
    MissingDatabasePath,
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `TALLY_HOST` overrides `server.host`
/// - `TALLY_PORT` overrides `server.port`
/// - `TALLY_LOG_LEVEL` overrides `logging.level`
/// - `TALLY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// The database location has its own chain; see [`resolve_database_path`].
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

    // Environment variable overrides
    if let Ok(host) = std::env::var("TALLY_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("TALLY_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("TALLY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("TALLY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

/// Resolves the database location: the first populated entry of
/// `TALLY_DATABASE_URL`, `DATABASE_URL`, `STORAGE_URL`, then the config
/// file's `database.path`.
///
/// Whatever wins is normalized through [`normalize_database_url`] before it
/// reaches the driver.
///
/// # Errors
///
/// Returns `ConfigError::MissingDatabasePath` when nothing in the chain is
/// set.
pub fn resolve_database_path(config: &Config) -> Result<String, ConfigError> {
    resolve_database_path_from(
        |name| std::env::var(name).ok(),
        config.database.path.as_deref(),
    )
}

fn resolve_database_path_from(
    env: impl Fn(&str) -> Option<String>,
    config_path: Option<&str>,
) -> Result<String, ConfigError> {
    for name in DATABASE_ENV_VARS {
        if let Some(value) = env(name) {
            if !value.trim().is_empty() {
                tracing::debug!(source = name, "resolved database location");
                return Ok(normalize_database_url(&value));
            }
        }
    }

    config_path
        .filter(|p| !p.trim().is_empty())
        .map(normalize_database_url)
        .ok_or(ConfigError::MissingDatabasePath)
}

/// Strips a `sqlite://` (or `sqlite:`) URL scheme prefix.
///
/// Deployment tooling tends to write URL-shaped values into `DATABASE_URL`;
/// the driver wants a bare filesystem path. `:memory:` (including the
/// `sqlite::memory:` URL form) passes through untouched.
pub fn normalize_database_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some(rest) = trimmed.strip_prefix("sqlite://") {
        return rest.to_string();
    }
    if let Some(rest) = trimmed.strip_prefix("sqlite:") {
        return rest.to_string();
    }
    trimmed.to_string()
}
