//! Error types for the render engine

use std::time::Duration;

use ac_01_datasource::AdapterError;
use shared_types::TemplateError;
use thiserror::Error;

/// Errors raised while compiling or evaluating an extraction path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Path text is not a supported JSONPath expression.
    #[error("Invalid extraction path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// A definite path selected nothing.
    #[error("Extraction path '{path}' matched nothing")]
    NoMatch { path: String },
}

/// Errors that abort a render.
///
/// A missing template is not an error; `render_chart` returns `Ok(None)`.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A binding names a data source that is not registered.
    #[error("Data source adapter not found: {0}")]
    AdapterNotFound(String),

    /// An adapter call failed.
    #[error("Binding '{binding}' failed: {source}")]
    AdapterExecution {
        binding: String,
        #[source]
        source: AdapterError,
    },

    /// An adapter call exceeded its time budget.
    #[error("Binding '{binding}' timed out after {timeout:?} on adapter {adapter}")]
    AdapterTimeout {
        binding: String,
        adapter: String,
        timeout: Duration,
    },

    /// The extraction path could not be applied to the fetched result.
    #[error("Extraction for binding '{binding}' failed: {source}")]
    Extraction {
        binding: String,
        #[source]
        source: ExtractionError,
    },

    /// The stored template is ambiguous or malformed.
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] TemplateError),

    /// The rendered option could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RenderError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::AdapterNotFound(_) => "adapter_not_found",
            RenderError::AdapterExecution { .. } => "adapter_execution",
            RenderError::AdapterTimeout { .. } => "adapter_timeout",
            RenderError::Extraction { .. } => "extraction",
            RenderError::InvalidTemplate(_) => "invalid_template",
            RenderError::Serialization(_) => "serialization",
        }
    }
}
