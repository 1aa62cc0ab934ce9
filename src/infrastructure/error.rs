//! Collector error types
//!
//! Transport, persistence and configuration failures. Markup problems inside a
//! single card are logged by the parser and never reach the sync loop.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Dataset I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl CollectorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type CollectorResult<T> = Result<T, CollectorError>;
