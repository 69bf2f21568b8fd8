//! Configuration management for the server.

use std::env;
use std::path::PathBuf;
use stow_engine::WriteMode;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory for JSON files; collections live in memory when unset
    pub data_dir: Option<PathBuf>,
    /// Serve `GET` from the store cache
    pub cache_enabled: bool,
    pub write_mode: WriteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: None,
            cache_enabled: true,
            write_mode: WriteMode::Optimistic,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let data_dir = lookup("DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let cache_enabled = match lookup("CACHE_ENABLED") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag("CACHE_ENABLED", raw))?,
            None => defaults.cache_enabled,
        };

        let write_mode = match lookup("WRITE_MODE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidWriteMode(raw))?,
            None => defaults.write_mode,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            cache_enabled,
            write_mode,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid {0} value: {1}")]
    InvalidFlag(&'static str, String),

    #[error("Invalid WRITE_MODE value: {0} (expected optimistic or pessimistic)")]
    InvalidWriteMode(String),
}
