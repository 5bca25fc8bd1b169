//! # Query Errors
//!
//! Error types for query building and validation.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Operator name or symbol not recognized
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Field referenced by the query does not exist in the collection
    #[error("Field '{field}' does not exist in collection '{collection}'")]
    UnknownField { collection: String, field: String },

    /// Operator value has the wrong shape
    #[error("Invalid operand for {operator} on '{field}': {reason}")]
    InvalidOperand {
        field: String,
        operator: String,
        reason: String,
    },

    /// Query built for another collection
    #[error("Query targets '{actual}' but was run against '{expected}'")]
    CollectionMismatch { expected: String, actual: String },

    /// Sort key could not be parsed
    #[error("Invalid sort key: '{0}'")]
    InvalidSort(String),

    /// Limit below -1
    #[error("Invalid limit {0}: use -1 for all items")]
    InvalidLimit(i64),

    /// Filter JSON could not be parsed
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl QueryError {
    pub fn invalid_operand(
        field: impl Into<String>,
        operator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOperand {
            field: field.into(),
            operator: operator.into(),
            reason: reason.into(),
        }
    }
}
