//! # Capability Port
//!
//! The contract the render engine depends on. Every adapter, regardless of
//! backend, is reached only through this trait.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use serde_json::Value;
use shared_types::Params;

use crate::domain::errors::AdapterError;

/// Lazy, cold stream of update events from a data source.
pub type AdapterStream = BoxStream<'static, Result<Value, AdapterError>>;

/// A data source the render engine can query.
///
/// Implementations must not block the async scheduler: intrinsically
/// blocking backends run their work on a dedicated bounded pool.
#[async_trait]
pub trait DataSourceAdapter: Send + Sync {
    /// Stable registry key.
    fn id(&self) -> &str;

    /// Run `query` once and return the raw result.
    async fn execute(&self, query: &str, params: &Params) -> Result<Value, AdapterError>;

    /// Open an independent update stream for `query`.
    ///
    /// Nothing happens until the stream is polled. Adapters without live
    /// updates return a stream that ends immediately.
    fn subscribe(&self, _query: &str, _params: &Params) -> AdapterStream {
        Box::pin(stream::empty())
    }
}
