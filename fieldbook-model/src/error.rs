//! Error types for the mapping layer.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the mapping layer.
///
/// Decoding a record never produces one of these; only identifier parsing and
/// write-payload checks do.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A record identifier could not be parsed.
    #[error("invalid record id: {0:?}")]
    InvalidId(String),

    /// A write payload carried a column outside the table's allow-list.
    #[error("field {field} is not updateable on {table}")]
    FieldNotUpdateable { table: &'static str, field: String },
}
