//! Error types for the LAPS backend

use std::io;

use thiserror::Error;

/// Result type alias for the LAPS backend
pub type Result<T> = std::result::Result<T, Error>;

/// LAPS backend errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// FSS returned a non-success status
    #[error("FSS error {status}: {message}")]
    Upstream {
        /// HTTP status returned by FSS
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an upstream error from an FSS response status and body.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}
