//! Configuration module for Files Manager.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{FilesError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/files_manager.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Content storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored payloads. Created on first write.
    #[serde(default = "default_folder_path")]
    pub folder_path: String,
}

fn default_folder_path() -> String {
    "/tmp/files_manager".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            folder_path: default_folder_path(),
        }
    }
}

/// Session token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Token time-to-live in seconds.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

impl SessionConfig {
    /// Token time-to-live as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
        }
    }
}

/// Thumbnail worker pool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailConfig {
    /// Number of concurrent workers.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Deliveries per job before a retryable failure is given up on.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay between redeliveries in milliseconds (multiplied by attempt).
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
    /// Bounded queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_workers() -> usize {
    2
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    500
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Content storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Thumbnail worker configuration.
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilesError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FilesError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: HTTP listen port
    /// - `DB_PATH`: SQLite database file
    /// - `FOLDER_PATH`: content storage root
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(path) = lookup("DB_PATH").filter(|p| !p.is_empty()) {
            self.database.path = path;
        }
        if let Some(path) = lookup("FOLDER_PATH").filter(|p| !p.is_empty()) {
            self.storage.folder_path = path;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.folder_path.is_empty() {
            return Err(FilesError::Config(
                "storage.folder_path must not be empty".to_string(),
            ));
        }
        if self.thumbnails.workers == 0 {
            return Err(FilesError::Config(
                "thumbnails.workers must be at least 1".to_string(),
            ));
        }
        if self.thumbnails.max_attempts == 0 {
            return Err(FilesError::Config(
                "thumbnails.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
