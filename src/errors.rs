//! # Client Errors
//!
//! Crate-level error aggregating every subsystem's errors.

use thiserror::Error;

use crate::files::FileError;
use crate::query::QueryError;
use crate::schema::SchemaError;
use crate::session::SessionError;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Client errors
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    File(#[from] FileError),

    /// Collection missing or not readable with this token
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Payload did not have the expected shape
    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse { endpoint: String, reason: String },

    /// Typed deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn unexpected(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status of the underlying session error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Session(e) => e.status_code(),
            _ => None,
        }
    }

    /// Whether this is a missing collection, file or folder
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::CollectionNotFound(_) => true,
            Error::File(e) => e.is_not_found(),
            Error::Session(e) => e.is_not_found(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_are_transparent() {
        let err: Error = SessionError::status(500, "boom").into();
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(err.status_code(), Some(500));

        let err: Error = QueryError::InvalidSort("-".into()).into();
        assert_eq!(err.to_string(), "Invalid sort key: '-'");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_not_found() {
        assert!(Error::CollectionNotFound("books".into()).is_not_found());
        assert!(Error::from(FileError::FileNotFound("a.png".into())).is_not_found());
        assert!(!Error::unexpected("items/books", "not an array").is_not_found());
    }
}
