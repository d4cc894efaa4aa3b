//! Error types for template storage

use shared_types::TemplateError;
use thiserror::Error;

/// Errors that can occur while writing templates.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Template failed validation and was not stored.
    #[error("Invalid template: {0}")]
    Invalid(#[from] TemplateError),

    /// Backing file could not be read or written.
    #[error("Storage I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// Backing file content is not a valid template map.
    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
