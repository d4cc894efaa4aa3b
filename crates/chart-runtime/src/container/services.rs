//! # Service Container
//!
//! Builds the shared registry, the template store and the render service
//! in dependency order:
//!
//! 1. Adapter registry (fixture, rest, database)
//! 2. Template store (file or memory), optionally seeded
//! 3. Render service over both

use std::sync::Arc;

use ac_01_datasource::{
    register_defaults, AdapterRegistry, ConnectionCatalog, DatabaseAdapter, StaticSqlDriver,
};
use ac_02_template_store::{
    seed_demo_templates, FileTemplateStore, InMemoryTemplateStore, TemplateStore,
};
use ac_03_render_engine::ChartRenderService;
use anyhow::{Context, Result};
use tracing::info;

use super::config::RuntimeConfig;

/// Every long-lived service of the runtime.
pub struct ServiceContainer {
    pub registry: Arc<AdapterRegistry>,
    pub store: Arc<dyn TemplateStore>,
    pub connections: Arc<ConnectionCatalog>,
    pub render: ChartRenderService,
}

impl ServiceContainer {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let registry = Arc::new(AdapterRegistry::new());
        register_defaults(&registry, &config.datasource)
            .context("Failed to register default adapters")?;

        let connections = Arc::new(ConnectionCatalog::with_default());
        registry.register(Arc::new(DatabaseAdapter::new(
            Arc::clone(&connections),
            Arc::new(StaticSqlDriver::demo()),
            config.datasource.blocking_pool_size,
        )));
        info!(adapters = ?registry.ids(), "Adapter registry ready");

        let store: Arc<dyn TemplateStore> = match &config.template_file {
            Some(path) => Arc::new(
                FileTemplateStore::open(path)
                    .with_context(|| format!("Failed to open template file {}", path.display()))?,
            ),
            None => Arc::new(InMemoryTemplateStore::new()),
        };

        if config.seed_demo {
            let seeded = seed_demo_templates(store.as_ref()).context("Failed to seed demo templates")?;
            info!(seeded, total = store.len(), "Template store ready");
        }

        let render = ChartRenderService::with_config(
            Arc::clone(&registry),
            Arc::clone(&store),
            config.engine.clone(),
        );

        Ok(Self {
            registry,
            store,
            connections,
            render,
        })
    }
}
