//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use shared_types::{Params, RenderedOption};

use crate::application::subscription::ChartStream;
use crate::domain::errors::RenderError;

/// Primary chart rendering API.
#[async_trait]
pub trait ChartRenderApi: Send + Sync {
    /// Render a stored template once.
    ///
    /// 1. Looks up the template (`Ok(None)` if absent)
    /// 2. Resolves every binding's adapter before any fetch
    /// 3. Fetches all bindings concurrently, failing fast
    /// 4. Extracts and splices values into the option skeleton
    async fn render_chart(
        &self,
        template_id: &str,
        params: &Params,
    ) -> Result<Option<RenderedOption>, RenderError>;

    /// Re-render a template every time one of its streaming bindings
    /// produces an event.
    ///
    /// The stream is empty if the template is absent or has no streaming
    /// binding. Dropping it stops the subscription.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime for a template that has a
    /// registered streaming binding, since the driver task is started with
    /// `tokio::spawn`.
    fn subscribe_chart(&self, template_id: &str, params: &Params) -> ChartStream;
}
