//! # Fixture Adapter
//!
//! Serves canned payloads for demos and tests. The dataset is the part of
//! the query after the first `:` (`fixture:sales`, `mock:trend`); a query
//! without a colon is the dataset name itself.
//!
//! The stream is independent of the query: every `interval` it emits one
//! synthetic single-item delta.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use serde_json::{json, Value};
use shared_types::Params;
use tracing::debug;

use crate::domain::errors::AdapterError;
use crate::ports::{AdapterStream, DataSourceAdapter};

/// Canned-payload adapter.
pub struct FixtureAdapter {
    datasets: HashMap<String, Value>,
    interval: Duration,
}

impl FixtureAdapter {
    /// Registry id.
    pub const ID: &'static str = "fixture";

    /// Create an adapter with the built-in datasets and a 2 s stream period.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(2))
    }

    /// Create an adapter with the built-in datasets and a custom period.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            datasets: builtin_datasets(),
            interval,
        }
    }

    /// Add or replace a dataset.
    #[must_use]
    pub fn with_dataset(mut self, name: impl Into<String>, payload: Value) -> Self {
        self.datasets.insert(name.into(), payload);
        self
    }

    /// Names of the available datasets, sorted.
    pub fn dataset_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.datasets.keys().cloned().collect();
        names.sort();
        names
    }

    fn dataset_name(query: &str) -> &str {
        query
            .split_once(':')
            .map_or(query, |(_, name)| name)
            .trim()
    }
}

impl Default for FixtureAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSourceAdapter for FixtureAdapter {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn execute(&self, query: &str, _params: &Params) -> Result<Value, AdapterError> {
        let name = Self::dataset_name(query);
        debug!(dataset = %name, "Serving fixture dataset");

        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::UnknownDataset(name.to_string()))
    }

    fn subscribe(&self, query: &str, _params: &Params) -> AdapterStream {
        let period = self.interval;
        debug!(query = %query, period_ms = period.as_millis() as u64, "Fixture stream opened");

        Box::pin(stream::unfold(0u32, move |tick| async move {
            tokio::time::sleep(period).await;
            Some((Ok(fixture_event(tick)), tick.saturating_add(1)))
        }))
    }
}

/// Synthetic delta for stream tick `tick` (0-based).
pub fn fixture_event(tick: u32) -> Value {
    let day = 3 + u64::from(tick);
    json!({
        "items": [
            { "date": format!("2026-01-{day:02}"), "value": 100 + u64::from(tick) * 10 }
        ]
    })
}

fn builtin_datasets() -> HashMap<String, Value> {
    let mut datasets = HashMap::new();

    datasets.insert(
        "sales".to_string(),
        json!({
            "items": [
                { "date": "2026-01-01", "value": 100 },
                { "date": "2026-01-02", "value": 150 }
            ]
        }),
    );

    datasets.insert(
        "trend".to_string(),
        json!({
            "items": [
                { "date": "2026-01-01", "value": 2.1 },
                { "date": "2026-01-02", "value": 3.4 },
                { "date": "2026-01-03", "value": 2.8 },
                { "date": "2026-01-04", "value": 4.2 },
                { "date": "2026-01-05", "value": 5.0 }
            ]
        }),
    );

    datasets.insert(
        "distribution".to_string(),
        json!({
            "items": [
                { "name": "Direct", "value": 335 },
                { "name": "Email", "value": 310 },
                { "name": "Ads", "value": 234 },
                { "name": "Search", "value": 1548 }
            ]
        }),
    );

    datasets.insert(
        "correlation".to_string(),
        json!({
            "items": [[10.0, 8.04], [8.07, 6.95], [13.0, 7.58], [9.05, 8.81], [11.0, 8.33]]
        }),
    );

    datasets.insert(
        "growth".to_string(),
        json!({
            "items": [
                { "date": "2026-01-01", "value": 120 },
                { "date": "2026-01-02", "value": 252 },
                { "date": "2026-01-03", "value": 403 },
                { "date": "2026-01-04", "value": 577 }
            ]
        }),
    );

    datasets
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_execute_sales_dataset() {
        let adapter = FixtureAdapter::new();
        let result = adapter.execute("fixture:sales", &Params::new()).await.unwrap();

        assert_eq!(
            result,
            json!({"items":[{"date":"2026-01-01","value":100},{"date":"2026-01-02","value":150}]})
        );
    }

    #[tokio::test]
    async fn test_any_prefix_selects_dataset() {
        let adapter = FixtureAdapter::new();
        let a = adapter.execute("mock:trend", &Params::new()).await.unwrap();
        let b = adapter.execute("trend", &Params::new()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_unknown_dataset_fails() {
        let adapter = FixtureAdapter::new();
        let err = adapter.execute("fixture:nope", &Params::new()).await.unwrap_err();
        assert!(matches!(err, AdapterError::UnknownDataset(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_custom_dataset() {
        let adapter = FixtureAdapter::new().with_dataset("kpi", json!({"total": 7}));
        let result = adapter.execute("fixture:kpi", &Params::new()).await.unwrap();
        assert_eq!(result["total"], 7);
        assert!(adapter.dataset_names().contains(&"kpi".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_emits_timed_events() {
        let adapter = FixtureAdapter::with_interval(Duration::from_millis(50));
        let events: Vec<_> = adapter
            .subscribe("fixture:sales", &Params::new())
            .take(3)
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        let first = events[0].as_ref().unwrap();
        assert_eq!(first["items"][0]["date"], "2026-01-03");
        assert_eq!(first["items"][0]["value"], 100);
        let third = events[2].as_ref().unwrap();
        assert_eq!(third["items"][0]["date"], "2026-01-05");
        assert_eq!(third["items"][0]["value"], 120);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_is_cold() {
        let adapter = FixtureAdapter::with_interval(Duration::from_millis(10));
        let mut first = adapter.subscribe("fixture:sales", &Params::new());
        let _ = first.next().await;
        let _ = first.next().await;

        // A second subscription starts from tick zero.
        let mut second = adapter.subscribe("fixture:sales", &Params::new());
        let event = second.next().await.unwrap().unwrap();
        assert_eq!(event["items"][0]["date"], "2026-01-03");
    }
}
