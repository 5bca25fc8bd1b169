//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::errors::Error;
use crate::session::SessionError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Missing or invalid url / token / timeouts
    ConfigError,
    /// Server not reachable
    ConnectError,
    /// A request or its payload failed
    RequestError,
    /// Invalid command argument (filter JSON, sort keys)
    InvalidArgument,
    /// Local I/O error (stdout, dump files)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DIRECTUS_CLI_CONFIG_ERROR",
            Self::ConnectError => "DIRECTUS_CLI_CONNECT_ERROR",
            Self::RequestError => "DIRECTUS_CLI_REQUEST_ERROR",
            Self::InvalidArgument => "DIRECTUS_CLI_INVALID_ARGUMENT",
            Self::IoError => "DIRECTUS_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<Error> for CliError {
    fn from(e: Error) -> Self {
        let code = match &e {
            Error::Session(SessionError::Config(_)) => CliErrorCode::ConfigError,
            Error::Session(SessionError::Unreachable { .. }) => CliErrorCode::ConnectError,
            Error::Query(_) => CliErrorCode::InvalidArgument,
            _ => CliErrorCode::RequestError,
        };
        Self::new(code, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;

    #[test]
    fn test_error_mapping() {
        let err: CliError = Error::from(SessionError::Config("URL not provided".into())).into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert_eq!(
            err.to_string(),
            "DIRECTUS_CLI_CONFIG_ERROR: Invalid configuration: URL not provided"
        );

        let err: CliError = Error::from(QueryError::InvalidSort("-".into())).into();
        assert_eq!(err.code_str(), "DIRECTUS_CLI_INVALID_ARGUMENT");

        let err: CliError = Error::CollectionNotFound("books".into()).into();
        assert_eq!(err.code(), &CliErrorCode::RequestError);
        assert_eq!(err.message(), "Collection not found: books");
    }
}
