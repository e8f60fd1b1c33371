//! Error types for the SBP client

use serde_json::Value;
use thiserror::Error;

/// Result type alias for SBP client operations
pub type Result<T> = std::result::Result<T, SbpError>;

/// Message used when the bank reports a failure without one
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Errors produced by the SBP client
#[derive(Debug, Error)]
pub enum SbpError {
    /// A required identifier combination is missing; raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The bank answered with a missing or non-zero `ErrorCode`
    #[error("API error {}: {message}", display_code(code))]
    Api {
        /// Remote `ErrorCode` exactly as received, `None` when absent
        code: Option<Value>,
        /// Human-readable message reported by the bank
        message: String,
    },

    /// The server answered with a non-success HTTP status
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        status: http::StatusCode,
        body: String,
    },

    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The signing key could not be loaded
    #[error("Key error: {0}")]
    Key(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SbpError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an API error from a remote code and message
    pub fn api(code: Option<Value>, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Create a key-loading error
    pub fn key(message: impl Into<String>) -> Self {
        Self::Key(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this is a local precondition failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether a later identical request could succeed.
    ///
    /// Remote, HTTP and transport failures are retryable; local validation,
    /// key and configuration failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::HttpStatus { .. } | Self::Transport(_) | Self::Serialization(_)
        )
    }

    /// Remote error code, if this is an API error carrying one
    pub fn api_code(&self) -> Option<&Value> {
        match self {
            Self::Api { code, .. } => code.as_ref(),
            _ => None,
        }
    }
}

fn display_code(code: &Option<Value>) -> String {
    match code {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<none>".to_string(),
    }
}
