//! Errors for persistence and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read/write planner snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed planner snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid bind address '{0}'")]
    InvalidAddr(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
