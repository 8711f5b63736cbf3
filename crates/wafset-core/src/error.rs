//! Error types for wafset
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for wafset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wafset
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing or invalid flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input rejected by the remote service
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IP set not found
    #[error("IP set not found: {0}")]
    NotFound(String),

    /// Authentication or authorization errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The IP set changed between the read and the write
    #[error("Lock token conflict: {0}")]
    Conflict(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// I/O errors (reading the input file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a lock token conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error means another writer got there first
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
