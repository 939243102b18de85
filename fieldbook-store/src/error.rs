//! Error types for the data-access layer.

use fieldbook_model::ModelError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to callers of the store.
///
/// Soft decode failures and partially failed batches are not represented
/// here. They are absorbed and logged by the mapping layer and the batch
/// aggregator respectively.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The transport could not be obtained (missing credentials, client
    /// construction failed).
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The store answered with a top-level rejection.
    #[error("backend rejected request: {message}")]
    BackendRejected { message: String },

    /// A single-record lookup came back empty.
    #[error("{kind} not found: {key}")]
    RecordNotFound { kind: &'static str, key: String },

    /// Every record in a write batch failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// HTTP client error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or incomplete configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A chat message had no content.
    #[error("message is empty")]
    EmptyMessage,

    /// A write payload failed the table's allow-list check.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StoreError {
    pub(crate) fn rejected(message: Option<String>, fallback: &str) -> Self {
        StoreError::BackendRejected {
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Whether this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RecordNotFound { .. })
    }

    /// Whether the store could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StoreError::TransportUnavailable(_) | StoreError::Http(_)
        )
    }
}
