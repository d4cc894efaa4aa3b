//! Chart Render Service
//!
//! Main service implementing `ChartRenderApi`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chart_telemetry::metrics::{record_fetch, record_fetch_failure, record_render};
use chart_telemetry::{time_histogram, RENDER_DURATION};
use futures::future::try_join_all;
use serde_json::Value;
use shared_types::{Binding, ChartTemplate, Params, RenderedOption};
use tracing::{debug, info, warn};

use crate::application::subscription::{self, ChartStream};
use crate::config::{EngineConfig, RenderConfig, SubscriptionConfig};
use crate::domain::errors::RenderError;
use crate::domain::extraction::extract;
use crate::domain::substitution::splice;
use crate::ports::inbound::ChartRenderApi;
use crate::ports::outbound::{AdapterRegistry, DataSourceAdapter, TemplateStore};

/// Chart Render Service
///
/// Orchestrates one render:
/// 1. Load the template snapshot
/// 2. Validate it
/// 3. Resolve every adapter
/// 4. Fetch all bindings concurrently with per-adapter timeouts
/// 5. Extract each binding's value
/// 6. Splice values into the option skeleton
///
/// Cloning is cheap; clones share the registry, store and configuration.
#[derive(Clone)]
pub struct ChartRenderService {
    registry: Arc<AdapterRegistry>,
    store: Arc<dyn TemplateStore>,
    config: Arc<EngineConfig>,
}

impl ChartRenderService {
    /// Create a service with default configuration.
    pub fn new(registry: Arc<AdapterRegistry>, store: Arc<dyn TemplateStore>) -> Self {
        Self::with_config(registry, store, EngineConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(
        registry: Arc<AdapterRegistry>,
        store: Arc<dyn TemplateStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Arc<AdapterRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn TemplateStore> {
        &self.store
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.config.render
    }

    pub fn subscription_config(&self) -> &SubscriptionConfig {
        &self.config.subscription
    }

    /// Render and record the outcome in metrics.
    pub async fn render(
        &self,
        template_id: &str,
        params: &Params,
    ) -> Result<Option<RenderedOption>, RenderError> {
        let _timer = time_histogram!(RENDER_DURATION);
        let result = self.render_snapshot(template_id, params).await;

        match &result {
            Ok(Some(_)) => record_render("success"),
            Ok(None) => record_render("not_found"),
            Err(e) => {
                warn!(template_id = %template_id, kind = e.kind(), error = %e, "Render failed");
                record_render("failure");
            }
        }
        result
    }

    async fn render_snapshot(
        &self,
        template_id: &str,
        params: &Params,
    ) -> Result<Option<RenderedOption>, RenderError> {
        let Some(template) = self.store.get(template_id) else {
            debug!(template_id = %template_id, "Template not found");
            return Ok(None);
        };

        template.validate()?;
        let adapters = self.resolve_adapters(&template)?;

        debug!(
            template_id = %template_id,
            bindings = template.bindings.len(),
            "Fetching bindings"
        );

        // Dropping the joined future on the first error cancels every
        // fetch still in flight.
        let fetches = template
            .bindings
            .iter()
            .zip(&adapters)
            .map(|(binding, adapter)| self.fetch(binding, adapter.as_ref(), params));
        let results = try_join_all(fetches).await?;

        let mut values = HashMap::with_capacity(template.bindings.len());
        for (binding, raw) in template.bindings.iter().zip(&results) {
            let value = extract(raw, &binding.extraction_path).map_err(|source| {
                RenderError::Extraction {
                    binding: binding.name.clone(),
                    source,
                }
            })?;
            values.insert(binding.placeholder_key.clone(), value);
        }

        let ChartTemplate {
            id,
            option_template: mut option,
            ..
        } = template;
        let replaced = splice(&mut option, &values);

        info!(template_id = %id, replaced, "Chart rendered");
        Ok(Some(RenderedOption::new(id, option)))
    }

    /// Adapters for every binding, in binding order. Fails on the first
    /// unregistered id before anything is fetched.
    fn resolve_adapters(
        &self,
        template: &ChartTemplate,
    ) -> Result<Vec<Arc<dyn DataSourceAdapter>>, RenderError> {
        template
            .bindings
            .iter()
            .map(|binding| {
                self.registry
                    .get(&binding.datasource_id)
                    .ok_or_else(|| RenderError::AdapterNotFound(binding.datasource_id.clone()))
            })
            .collect()
    }

    async fn fetch(
        &self,
        binding: &Binding,
        adapter: &dyn DataSourceAdapter,
        params: &Params,
    ) -> Result<Value, RenderError> {
        let adapter_id = binding.datasource_id.as_str();
        let limit = self.config.render.timeout_for(adapter_id);
        let started = Instant::now();

        match tokio::time::timeout(limit, adapter.execute(&binding.query, params)).await {
            Ok(Ok(value)) => {
                record_fetch(adapter_id, started.elapsed().as_secs_f64());
                Ok(value)
            }
            Ok(Err(source)) => {
                record_fetch_failure(adapter_id, "error");
                debug!(binding = %binding.name, adapter = %adapter_id, error = %source, "Fetch failed");
                Err(RenderError::AdapterExecution {
                    binding: binding.name.clone(),
                    source,
                })
            }
            Err(_) => {
                record_fetch_failure(adapter_id, "timeout");
                Err(RenderError::AdapterTimeout {
                    binding: binding.name.clone(),
                    adapter: adapter_id.to_string(),
                    timeout: limit,
                })
            }
        }
    }
}

#[async_trait]
impl ChartRenderApi for ChartRenderService {
    async fn render_chart(
        &self,
        template_id: &str,
        params: &Params,
    ) -> Result<Option<RenderedOption>, RenderError> {
        self.render(template_id, params).await
    }

    fn subscribe_chart(&self, template_id: &str, params: &Params) -> ChartStream {
        subscription::subscribe(self, template_id, params)
    }
}
