//! Schema error types
//!
//! Raised while parsing field metadata or checking an insert/update
//! payload against a collection's fields. Payload errors are always
//! raised before any request is sent.

use std::fmt;

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field name (or `$root` for the payload itself)
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(field, "a field of the collection", "unknown field")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn too_long(field: impl Into<String>, max: u64, actual: usize) -> Self {
        Self::new(
            field,
            format!("at most {} characters", max),
            format!("{} characters", actual),
        )
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field metadata could not be parsed
    #[error("Invalid field data: {0}")]
    InvalidFieldData(String),

    /// Payload does not match the collection schema
    #[error("Payload rejected for collection '{collection}': {details}")]
    ValidationFailed {
        collection: String,
        details: ValidationDetails,
    },
}

impl SchemaError {
    pub fn validation_failed(collection: impl Into<String>, details: ValidationDetails) -> Self {
        Self::ValidationFailed {
            collection: collection.into(),
            details,
        }
    }

    /// Validation details, if this is a payload error
    pub fn details(&self) -> Option<&ValidationDetails> {
        match self {
            SchemaError::ValidationFailed { details, .. } => Some(details),
            SchemaError::InvalidFieldData(_) => None,
        }
    }
}

/// JSON type name for error messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        serde_json::Value::Number(_) => "float",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
