//! # Chart Domain Entities
//!
//! ## Clusters
//!
//! - **Template**: `ChartTemplate`, `Binding`
//! - **Output**: `RenderedOption`
//! - **Request**: `Params`
//!
//! Field names serialize in camelCase. The legacy names `mappingPath`,
//! `bindingKey` and `stream` are accepted when deserializing bindings.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TemplateError;
use crate::placeholder::placeholder_key;

/// Caller-supplied variables passed verbatim to every data-source call.
pub type Params = BTreeMap<String, Value>;

// =============================================================================
// CLUSTER A: TEMPLATE
// =============================================================================

/// Declarative link from a template slot to a data-source query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Join key for this slot's fetched result. Unique per template.
    pub name: String,
    /// Registry id of the adapter that serves `query`.
    pub datasource_id: String,
    /// Opaque query, interpreted only by the adapter.
    pub query: String,
    /// JSONPath expression selecting the value to substitute.
    #[serde(alias = "mappingPath")]
    pub extraction_path: String,
    /// Token name the extracted value replaces.
    #[serde(alias = "bindingKey")]
    pub placeholder_key: String,
    /// Whether this binding's adapter may be subscribed for live updates.
    #[serde(default, alias = "stream")]
    pub streaming: bool,
}

impl Binding {
    /// Create a non-streaming binding.
    pub fn new(
        name: impl Into<String>,
        datasource_id: impl Into<String>,
        query: impl Into<String>,
        extraction_path: impl Into<String>,
        placeholder_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            datasource_id: datasource_id.into(),
            query: query.into(),
            extraction_path: extraction_path.into(),
            placeholder_key: placeholder_key.into(),
            streaming: false,
        }
    }

    /// Mark this binding as streaming.
    #[must_use]
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }
}

/// A chart description: option skeleton plus ordered bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTemplate {
    /// Identifier, unique across the store.
    pub id: String,
    /// Display title (opaque to the engine).
    #[serde(default)]
    pub title: String,
    /// Chart kind such as bar, line, pie (opaque to the engine).
    #[serde(default)]
    pub chart_type: String,
    /// Option skeleton containing placeholder tokens.
    pub option_template: Value,
    /// Bindings in resolution order.
    #[serde(default)]
    pub bindings: Vec<Binding>,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ChartTemplate {
    /// Create a template with no bindings.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        chart_type: impl Into<String>,
        option_template: Value,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            chart_type: chart_type.into(),
            option_template,
            bindings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a template whose skeleton is given as JSON text.
    pub fn from_option_str(
        id: impl Into<String>,
        title: impl Into<String>,
        chart_type: impl Into<String>,
        option_template: &str,
    ) -> Result<Self, TemplateError> {
        let option = serde_json::from_str(option_template)?;
        Ok(Self::new(id, title, chart_type, option))
    }

    /// Parse a complete template document.
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a binding.
    #[must_use]
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Bindings flagged as streaming, in list order.
    pub fn streaming_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().filter(|b| b.streaming)
    }

    /// Check identifiers and binding uniqueness.
    ///
    /// Rejects an empty id, duplicate binding names, and two bindings
    /// sharing a placeholder key.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.id.trim().is_empty() {
            return Err(TemplateError::EmptyId);
        }

        let mut names = HashSet::with_capacity(self.bindings.len());
        let mut keys: HashMap<&str, &str> = HashMap::with_capacity(self.bindings.len());

        for binding in &self.bindings {
            if !names.insert(binding.name.as_str()) {
                return Err(TemplateError::DuplicateBindingName(binding.name.clone()));
            }
            if let Some(first) = keys.insert(binding.placeholder_key.as_str(), binding.name.as_str()) {
                return Err(TemplateError::DuplicatePlaceholderKey {
                    key: binding.placeholder_key.clone(),
                    first: first.to_string(),
                    second: binding.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Placeholder keys appearing in the skeleton (object keys visited in map order).
    pub fn placeholder_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_placeholder_keys(&self.option_template, &mut keys);
        keys
    }
}

fn collect_placeholder_keys(node: &Value, keys: &mut Vec<String>) {
    match node {
        Value::String(s) => {
            if let Some(key) = placeholder_key(s) {
                keys.push(key.to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_placeholder_keys(v, keys)),
        Value::Object(map) => map.values().for_each(|v| collect_placeholder_keys(v, keys)),
        _ => {}
    }
}

// =============================================================================
// CLUSTER B: OUTPUT
// =============================================================================

/// A fully resolved chart option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedOption {
    /// Id of the template this option was rendered from.
    pub id: String,
    /// The substituted option tree.
    pub option: Value,
}

impl RenderedOption {
    pub fn new(id: impl Into<String>, option: Value) -> Self {
        Self {
            id: id.into(),
            option,
        }
    }

    /// Serialize to compact JSON text.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales_template() -> ChartTemplate {
        ChartTemplate::new(
            "sales",
            "Sales",
            "bar",
            json!({"xAxis": {"data": "{{binding:categories}}"}, "series": [{"data": "{{binding:series1}}"}]}),
        )
        .with_binding(Binding::new("categories", "fixture", "fixture:sales", "$.items[*].date", "categories"))
        .with_binding(Binding::new("series1", "fixture", "fixture:sales", "$.items[*].value", "series1"))
    }

    #[test]
    fn test_valid_template() {
        assert!(sales_template().validate().is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut template = sales_template();
        template.id = "  ".into();
        assert!(matches!(template.validate(), Err(TemplateError::EmptyId)));
    }

    #[test]
    fn test_duplicate_binding_name_rejected() {
        let template = sales_template().with_binding(Binding::new(
            "series1", "fixture", "fixture:sales", "$.items", "other",
        ));
        assert!(matches!(
            template.validate(),
            Err(TemplateError::DuplicateBindingName(name)) if name == "series1"
        ));
    }

    #[test]
    fn test_duplicate_placeholder_key_rejected() {
        let template = sales_template().with_binding(Binding::new(
            "series2", "fixture", "fixture:sales", "$.items", "series1",
        ));
        match template.validate() {
            Err(TemplateError::DuplicatePlaceholderKey { key, first, second }) => {
                assert_eq!(key, "series1");
                assert_eq!(first, "series1");
                assert_eq!(second, "series2");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_keys_in_document() {
        let keys = sales_template().placeholder_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"categories".to_string()));
        assert!(keys.contains(&"series1".to_string()));
    }

    #[test]
    fn test_legacy_field_aliases() {
        let binding: Binding = serde_json::from_value(json!({
            "name": "ds1",
            "datasourceId": "fixture",
            "query": "mock:sales",
            "mappingPath": "$.items[*].date",
            "bindingKey": "categories",
            "stream": true
        }))
        .unwrap();

        assert_eq!(binding.extraction_path, "$.items[*].date");
        assert_eq!(binding.placeholder_key, "categories");
        assert!(binding.streaming);
    }

    #[test]
    fn test_template_json_roundtrip_shape() {
        let value = serde_json::to_value(sales_template()).unwrap();
        assert!(value.get("optionTemplate").is_some());
        assert!(value.get("chartType").is_some());
        assert_eq!(value["bindings"][0]["placeholderKey"], "categories");
    }

    #[test]
    fn test_from_json_str_defaults() {
        let template = ChartTemplate::from_json_str(
            r#"{"id":"t1","optionTemplate":{"series":[]}}"#,
        )
        .unwrap();
        assert!(template.bindings.is_empty());
        assert!(template.title.is_empty());
    }

    #[test]
    fn test_streaming_bindings_in_order() {
        let template = sales_template()
            .with_binding(Binding::new("live", "fixture", "fixture:trend", "$", "live").streaming());
        let names: Vec<_> = template.streaming_bindings().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["live"]);
    }
}
