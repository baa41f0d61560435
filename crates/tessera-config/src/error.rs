//! Configuration error types

use std::path::PathBuf;

use tessera_abac::AbacError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid seed rule at index {index}: {source}")]
    InvalidRule { index: usize, source: AbacError },

    #[error("XDG directory error: {0}")]
    XdgError(String),
}
