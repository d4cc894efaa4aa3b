//! Error types for data-source adapters

use thiserror::Error;

/// Errors that can occur while executing or subscribing to a data source.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Backend reported a failure.
    #[error("{adapter} execution failed: {message}")]
    Execution { adapter: String, message: String },

    /// Query string could not be interpreted by the adapter.
    #[error("Invalid query for {adapter}: {reason}")]
    InvalidQuery { adapter: String, reason: String },

    /// Fixture query named a dataset that does not exist.
    #[error("Unknown fixture dataset: {0}")]
    UnknownDataset(String),

    /// Database connection id is not in the catalog.
    #[error("Database connection not found: {0}")]
    UnknownConnection(String),

    /// Database connection exists but is disabled.
    #[error("Database connection is inactive: {0}")]
    InactiveConnection(String),

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP response with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Backend payload is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking worker pool has been shut down.
    #[error("Blocking worker pool closed")]
    PoolClosed,

    /// Blocking worker panicked or was cancelled.
    #[error("Blocking task failed: {0}")]
    Task(String),
}

impl AdapterError {
    /// Build an execution error for the given adapter.
    pub fn execution(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Build an invalid-query error for the given adapter.
    pub fn invalid_query(adapter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            adapter: adapter.into(),
            reason: reason.into(),
        }
    }
}
