//! In-memory template store

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use shared_types::ChartTemplate;
use tracing::debug;

use crate::errors::StoreError;
use crate::ports::TemplateStore;

/// Template store backed by a `HashMap` behind a read-write lock.
#[derive(Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<HashMap<String, ChartTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template without validation.
    ///
    /// Used by the file store after it has validated and persisted, and by
    /// tests staging templates that `save` would reject. The render engine
    /// validates again before using them.
    pub fn insert_unchecked(&self, template: ChartTemplate) {
        self.templates.write().insert(template.id.clone(), template);
    }

    pub(crate) fn from_map(templates: HashMap<String, ChartTemplate>) -> Self {
        Self {
            templates: RwLock::new(templates),
        }
    }

    pub(crate) fn snapshot(&self) -> HashMap<String, ChartTemplate> {
        self.templates.read().clone()
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn get(&self, id: &str) -> Option<ChartTemplate> {
        self.templates.read().get(id).cloned()
    }

    fn save(&self, template: ChartTemplate) -> Result<(), StoreError> {
        template.validate()?;
        debug!(template_id = %template.id, bindings = template.bindings.len(), "Saving template");
        self.templates.write().insert(template.id.clone(), template);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.templates.write().remove(id).is_some())
    }

    fn get_all(&self) -> BTreeMap<String, ChartTemplate> {
        self.templates
            .read()
            .iter()
            .map(|(id, template)| (id.clone(), template.clone()))
            .collect()
    }

    fn len(&self) -> usize {
        self.templates.read().len()
    }
}
