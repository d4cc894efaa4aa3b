//! Template storage port

use std::collections::BTreeMap;

use shared_types::ChartTemplate;

use crate::errors::StoreError;

/// Key-value store of chart templates keyed by `id`.
///
/// Implementations are shared between concurrent renders and must be
/// `Send + Sync`.
pub trait TemplateStore: Send + Sync {
    /// Snapshot of the template with `id`.
    fn get(&self, id: &str) -> Option<ChartTemplate>;

    /// Validate and insert or replace a template.
    fn save(&self, template: ChartTemplate) -> Result<(), StoreError>;

    /// Remove a template; returns whether it existed.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Every template, ordered by id.
    fn get_all(&self) -> BTreeMap<String, ChartTemplate>;

    /// Number of stored templates.
    fn len(&self) -> usize {
        self.get_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
