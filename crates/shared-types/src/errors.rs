//! # Error Types
//!
//! Defines template validation errors shared across crates.

use thiserror::Error;

/// Errors raised when a chart template is malformed or ambiguous.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template identifier is empty.
    #[error("Template id must not be empty")]
    EmptyId,

    /// Two bindings share the same `name` (the join key).
    #[error("Duplicate binding name: {0}")]
    DuplicateBindingName(String),

    /// Two bindings target the same placeholder key.
    #[error("Placeholder key {key} is bound twice (bindings {first} and {second})")]
    DuplicatePlaceholderKey {
        key: String,
        first: String,
        second: String,
    },

    /// Template text is not valid JSON.
    #[error("Template parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
