//! Error types for ResortDesk
//!
//! Store operations only ever fail with `RequestError`. Everything above
//! the stores (configuration, CLI) is converted to `AppError`.

use thiserror::Error;

/// Failure of a single call to the remote server
///
/// Raised when the collaborator's call cannot be completed or the server
/// answers with a non-success status. Never retried.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection, TLS or timeout failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Server returned {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// Response body did not match the expected entity
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl RequestError {
    /// Short label used for the error metric
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Transport(_) => "transport",
            RequestError::Status { .. } => "status",
            RequestError::Decode(_) => "decode",
        }
    }
}

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote call failed
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
