//! Error types for the KORTEX core library.

use thiserror::Error;

/// Result type alias using the KORTEX core `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for client-side state operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or malformed; nothing was attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error was raised before any side effect took place.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
