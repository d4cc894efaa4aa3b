//! Shared wiring for integration tests and benchmarks.

use std::sync::Arc;
use std::time::Duration;

use ac_01_datasource::{
    AdapterRegistry, ConnectionCatalog, DatabaseAdapter, FixtureAdapter, StaticSqlDriver,
};
use ac_02_template_store::{seed_demo_templates, InMemoryTemplateStore, TemplateStore};
use ac_03_render_engine::{ChartRenderService, EngineConfig};

/// A registry, catalog and store wired the way the runtime wires them,
/// minus the REST adapter.
pub struct Stack {
    pub registry: Arc<AdapterRegistry>,
    pub connections: Arc<ConnectionCatalog>,
    pub store: Arc<dyn TemplateStore>,
    pub service: ChartRenderService,
}

impl Stack {
    /// Seeded in-memory stack with a fast fixture stream.
    pub fn demo(fixture_interval: Duration) -> Self {
        let store: Arc<dyn TemplateStore> = Arc::new(InMemoryTemplateStore::new());
        // Seeding an empty in-memory store cannot fail.
        let _ = seed_demo_templates(store.as_ref());
        Self::with_store(store, fixture_interval, EngineConfig::default())
    }

    pub fn with_store(
        store: Arc<dyn TemplateStore>,
        fixture_interval: Duration,
        config: EngineConfig,
    ) -> Self {
        let connections = Arc::new(ConnectionCatalog::with_default());
        let registry = Arc::new(
            AdapterRegistry::new()
                .with_adapter(Arc::new(FixtureAdapter::with_interval(fixture_interval)))
                .with_adapter(Arc::new(DatabaseAdapter::new(
                    Arc::clone(&connections),
                    Arc::new(StaticSqlDriver::demo()),
                    4,
                ))),
        );
        let service = ChartRenderService::with_config(Arc::clone(&registry), Arc::clone(&store), config);

        Self {
            registry,
            connections,
            store,
            service,
        }
    }
}
