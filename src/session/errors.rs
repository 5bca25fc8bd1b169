//! # Session Errors
//!
//! Error types for the HTTP transport layer.

use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Transport errors
#[derive(Debug, Error)]
pub enum SessionError {
    // ==================
    // Local Errors
    // ==================
    /// Invalid client configuration (url, token, timeouts)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ==================
    // Remote Errors
    // ==================
    /// Directus answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Health check failed while connecting
    #[error("API not reachable - check URL ({url}) and API key {token_hint}...: {reason}")]
    Unreachable {
        url: String,
        token_hint: String,
        reason: String,
    },

    /// Response body was not the JSON we expected
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Underlying HTTP client error (connect, timeout, body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal state error (poisoned lock in the memory transport)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Build a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SessionError::Status { status, .. } => Some(*status),
            SessionError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the retry policy may try this request again.
    ///
    /// Connection failures, timeouts, 429 and 5xx are transient. Other 4xx are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SessionError::Status { status, .. } => *status == 429 || *status >= 500,
            SessionError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Whether the remote reported the resource as missing or forbidden.
    ///
    /// Directus answers 403 for collections that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.status_code(), Some(403) | Some(404))
    }
}
