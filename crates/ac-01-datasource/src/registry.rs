//! # Adapter Registry
//!
//! Process-wide id → adapter mapping. Registration normally happens at
//! startup, but the map is concurrent so lookups from in-flight renders
//! and late registrations never block each other.
//!
//! Aliases map an extra id onto a registered one. `register_defaults`
//! installs [`LEGACY_ALIASES`] so templates written against the older
//! adapter ids (`mock-adapter`, `rest-adapter`, `database-adapter`) still
//! resolve.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::adapters::database::DatabaseAdapter;
use crate::adapters::fixture::FixtureAdapter;
use crate::adapters::rest::RestAdapter;
use crate::config::DatasourceConfig;
use crate::domain::errors::AdapterError;
use crate::ports::DataSourceAdapter;

/// Older adapter ids and the ids that now serve them.
pub const LEGACY_ALIASES: [(&str, &str); 3] = [
    ("mock-adapter", FixtureAdapter::ID),
    ("rest-adapter", RestAdapter::ID),
    ("database-adapter", DatabaseAdapter::ID),
];

/// Registry of data-source adapters keyed by `id()`.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: DashMap<String, Arc<dyn DataSourceAdapter>>,
    /// alias -> canonical id, resolved at lookup time.
    aliases: DashMap<String, String>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own id.
    ///
    /// A later registration with the same id replaces the earlier one; the
    /// replaced adapter is returned.
    pub fn register(
        &self,
        adapter: Arc<dyn DataSourceAdapter>,
    ) -> Option<Arc<dyn DataSourceAdapter>> {
        let id = adapter.id().to_string();
        let previous = self.adapters.insert(id.clone(), adapter);

        if previous.is_some() {
            warn!(adapter_id = %id, "Adapter replaced an existing registration");
        } else {
            info!(adapter_id = %id, "Adapter registered");
        }
        previous
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_adapter(self, adapter: Arc<dyn DataSourceAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Make `alias` resolve to whatever is registered under `target`.
    ///
    /// The target need not be registered yet. A registered id always
    /// wins over an alias of the same name.
    pub fn alias(&self, alias: impl Into<String>, target: impl Into<String>) {
        let (alias, target) = (alias.into(), target.into());
        debug!(alias = %alias, adapter_id = %target, "Adapter alias added");
        self.aliases.insert(alias, target);
    }

    /// Look up an adapter by id or alias.
    pub fn get(&self, id: &str) -> Option<Arc<dyn DataSourceAdapter>> {
        if let Some(entry) = self.adapters.get(id) {
            return Some(Arc::clone(entry.value()));
        }
        let target = self.aliases.get(id)?.value().clone();
        self.adapters.get(&target).map(|entry| Arc::clone(entry.value()))
    }

    /// Registered ids, sorted. Aliases are not listed.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.adapters.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Register the adapters that need no external wiring (fixture and REST)
/// along with [`LEGACY_ALIASES`].
///
/// The database adapter needs a driver and catalog, so the composition
/// root registers it separately; its legacy alias starts resolving once
/// it does.
pub fn register_defaults(
    registry: &AdapterRegistry,
    config: &DatasourceConfig,
) -> Result<(), AdapterError> {
    registry.register(Arc::new(FixtureAdapter::with_interval(
        config.fixture_interval,
    )));
    registry.register(Arc::new(RestAdapter::new(config.http_timeout)?));
    for (alias, target) in LEGACY_ALIASES {
        registry.alias(alias, target);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::StaticAdapter;
    use serde_json::json;
    use shared_types::Params;

    fn static_adapter(id: &str, payload: serde_json::Value) -> Arc<dyn DataSourceAdapter> {
        Arc::new(StaticAdapter {
            id: id.to_string(),
            payload,
        })
    }

    #[test]
    fn test_register_and_get() {
        let registry = AdapterRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register(static_adapter("a", json!(1))).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get("a").is_some());
        assert!(registry.get("b").is_none());
    }

    #[tokio::test]
    async fn test_reregistration_replaces() {
        let registry = AdapterRegistry::new()
            .with_adapter(static_adapter("a", json!("old")));

        let previous = registry.register(static_adapter("a", json!("new")));
        assert!(previous.is_some());
        assert_eq!(registry.len(), 1);

        let adapter = registry.get("a").unwrap();
        let value = adapter.execute("q", &Params::new()).await.unwrap();
        assert_eq!(value, json!("new"));
    }

    #[tokio::test]
    async fn test_register_defaults() {
        let registry = AdapterRegistry::new();
        register_defaults(&registry, &DatasourceConfig::default()).unwrap();
        assert_eq!(registry.ids(), vec!["fixture", "rest"]);
        assert_eq!(registry.get("mock-adapter").unwrap().id(), "fixture");
        assert_eq!(registry.get("rest-adapter").unwrap().id(), "rest");
        // Resolves once the database adapter is registered.
        assert!(registry.get("database-adapter").is_none());
    }

    #[tokio::test]
    async fn test_alias_follows_reregistration() {
        let registry = AdapterRegistry::new().with_adapter(static_adapter("a", json!("old")));
        registry.alias("legacy-a", "a");
        assert_eq!(registry.ids(), vec!["a"]);

        registry.register(static_adapter("a", json!("new")));
        let adapter = registry.get("legacy-a").unwrap();
        assert_eq!(adapter.execute("q", &Params::new()).await.unwrap(), json!("new"));
        assert!(registry.get("legacy-b").is_none());
    }

    #[test]
    fn test_registered_id_shadows_alias() {
        let registry = AdapterRegistry::new()
            .with_adapter(static_adapter("a", json!(1)))
            .with_adapter(static_adapter("b", json!(2)));
        registry.alias("b", "a");
        assert_eq!(registry.get("b").unwrap().id(), "b");
    }
}
