//! # Chart Runtime
//!
//! Composition root for the render pipeline.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize telemetry
//! 3. Build the adapter registry and template store, seed demo charts
//! 4. Render every stored chart and print the options as JSON lines
//! 5. Follow the demo chart live for a few events (Ctrl-C stops early)

pub mod container;

use std::io::Write;

use ac_03_render_engine::ChartRenderApi;
use anyhow::Result;
use futures::StreamExt;
use shared_types::Params;
use tracing::{debug, error, info, warn};

use crate::container::{RuntimeConfig, ServiceContainer};

/// Outcome of one pass over the template store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub rendered: usize,
    pub missing: usize,
    /// Template id and error message for each failed render.
    pub failed: Vec<(String, String)>,
}

/// The chart runtime.
pub struct ChartRuntime {
    config: RuntimeConfig,
    container: ServiceContainer,
}

impl ChartRuntime {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let container = ServiceContainer::new(&config)?;
        Ok(Self { config, container })
    }

    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// Render every stored template, writing one JSON line per success.
    pub async fn render_all<W: Write>(&self, out: &mut W) -> Result<RenderSummary> {
        let params = Params::new();
        let mut summary = RenderSummary::default();

        for id in self.container.store.get_all().into_keys() {
            match self.container.render.render_chart(&id, &params).await {
                Ok(Some(rendered)) => {
                    writeln!(out, "{}", rendered.to_json_string()?)?;
                    summary.rendered += 1;
                }
                // Deleted between listing and rendering.
                Ok(None) => summary.missing += 1,
                Err(e) => {
                    error!(template_id = %id, error = %e, "Chart render failed");
                    summary.failed.push((id, e.to_string()));
                }
            }
        }

        info!(
            rendered = summary.rendered,
            failed = summary.failed.len(),
            "Render pass complete"
        );
        Ok(summary)
    }

    /// Print up to `max_events` live renders of `chart_id`.
    ///
    /// Returns the number printed. Stops early when the subscription ends
    /// or fails.
    pub async fn follow_live<W: Write>(
        &self,
        chart_id: &str,
        max_events: usize,
        out: &mut W,
    ) -> Result<usize> {
        if max_events == 0 {
            return Ok(0);
        }

        let stream = self.container.render.subscribe_chart(chart_id, &Params::new());
        info!(chart_id = %chart_id, subscription_id = %stream.id(), max_events, "Following chart live");

        let mut printed = 0;
        let mut stream = stream.take(max_events);
        while let Some(update) = stream.next().await {
            match update {
                Ok(rendered) => {
                    writeln!(out, "{}", rendered.to_json_string()?)?;
                    printed += 1;
                }
                Err(e) => {
                    warn!(chart_id = %chart_id, error = %e, "Live subscription failed");
                    break;
                }
            }
        }

        Ok(printed)
    }

    /// Render pass followed by the configured live follow.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        let summary = self.render_all(out).await?;
        if !summary.failed.is_empty() {
            warn!(failed = ?summary.failed, "Some charts failed to render");
        }

        let printed = self
            .follow_live(&self.config.demo_chart, self.config.live_events, out)
            .await?;
        info!(printed, "Live follow finished");

        match chart_telemetry::encode_metrics() {
            Ok(metrics) => debug!(metrics = %metrics, "Final metrics"),
            Err(e) => warn!(error = %e, "Metrics encoding failed"),
        }
        Ok(())
    }
}
