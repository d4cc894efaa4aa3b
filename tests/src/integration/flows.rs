//! # Snapshot Render Flows
//!
//! Template store, adapter registry and render engine working together:
//!
//! 1. **Store → Engine**: every seeded demo chart renders with all tokens spliced
//! 2. **Engine → Database adapter**: SQL rows flow through extraction
//! 3. **File store → Engine**: templates survive a reopen and still render
//! 4. **Custom adapters**: params reach adapters registered at runtime

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use ac_01_datasource::{AdapterError, DataSourceAdapter};
    use ac_02_template_store::{
        demo_templates, seed_demo_templates, FileTemplateStore, TemplateStore,
    };
    use ac_03_render_engine::{ChartRenderApi, EngineConfig, RenderError};
    use shared_types::{Binding, ChartTemplate, Params};

    use crate::fixtures::Stack;

    const INTERVAL: Duration = Duration::from_millis(10);

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Returns the `region` param wrapped in an items array.
    struct RegionAdapter;

    #[async_trait]
    impl DataSourceAdapter for RegionAdapter {
        fn id(&self) -> &str {
            "region"
        }

        async fn execute(&self, query: &str, params: &Params) -> Result<Value, AdapterError> {
            let region = params
                .get("region")
                .cloned()
                .ok_or_else(|| AdapterError::InvalidQuery {
                    adapter: "region".to_string(),
                    reason: format!("query '{query}' needs a region param"),
                })?;
            Ok(json!({ "items": [{ "region": region }] }))
        }
    }

    fn region_template() -> ChartTemplate {
        ChartTemplate::new(
            "region-title",
            "Region",
            "bar",
            json!({ "title": { "text": "{{binding:region}}" } }),
        )
        .with_binding(Binding::new("region", "region", "lookup", "$.items[0].region", "region"))
    }

    // =========================================================================
    // STORE → ENGINE
    // =========================================================================

    #[tokio::test]
    async fn test_every_demo_chart_renders() {
        let stack = Stack::demo(INTERVAL);
        let params = Params::new();

        for id in stack.store.get_all().into_keys() {
            let rendered = stack
                .service
                .render_chart(&id, &params)
                .await
                .unwrap_or_else(|e| panic!("{id} failed: {e}"))
                .unwrap_or_else(|| panic!("{id} missing"));

            assert_eq!(rendered.id, id);
            let text = rendered.to_json_string().unwrap();
            assert!(!text.contains("{{binding:"), "{id} kept a placeholder: {text}");
        }
    }

    #[tokio::test]
    async fn test_legacy_sales_chart_values() {
        let stack = Stack::demo(INTERVAL);

        let rendered = stack
            .service
            .render_chart("sales-2026", &Params::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(rendered.option["xAxis"]["data"], json!(["2026-01-01", "2026-01-02"]));
        assert_eq!(rendered.option["series"][0]["data"], json!([100, 150]));
        assert_eq!(rendered.option["title"]["text"], "Sales");
    }

    #[tokio::test]
    async fn test_unknown_chart_is_absent() {
        let stack = Stack::demo(INTERVAL);
        let result = stack.service.render_chart("nope", &Params::new()).await.unwrap();
        assert!(result.is_none());
    }

    // =========================================================================
    // ENGINE → DATABASE ADAPTER
    // =========================================================================

    #[tokio::test]
    async fn test_database_chart_top_products() {
        let stack = Stack::demo(INTERVAL);

        let rendered = stack
            .service
            .render_chart("db-product-sales", &Params::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            rendered.option["xAxis"]["data"],
            json!(["Laptop", "Monitor", "Keyboard", "Headset", "Mouse"])
        );
        assert_eq!(
            rendered.option["series"][0]["data"],
            json!([48200, 23150, 9870, 7640, 5320])
        );
    }

    #[tokio::test]
    async fn test_inactive_connection_fails_render() {
        let stack = Stack::demo(INTERVAL);
        let mut connection = stack.connections.get("local-default").unwrap();
        connection.active = false;
        stack.connections.save(connection);

        let err = stack
            .service
            .render_chart("db-product-sales", &Params::new())
            .await
            .unwrap_err();

        match err {
            RenderError::AdapterExecution { source, .. } => {
                assert!(matches!(source, AdapterError::InactiveConnection(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_deleted_connection_fails_render() {
        let stack = Stack::demo(INTERVAL);
        assert!(stack.connections.delete("local-default"));

        let err = stack
            .service
            .render_chart("db-product-sales", &Params::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::AdapterExecution {
                source: AdapterError::UnknownConnection(_),
                ..
            }
        ));
    }

    // =========================================================================
    // FILE STORE → ENGINE
    // =========================================================================

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");

        {
            let store = FileTemplateStore::open(&path).unwrap();
            assert_eq!(seed_demo_templates(&store).unwrap(), demo_templates().len());
            assert!(store.delete("growth-area").unwrap());
        }

        let store: Arc<dyn TemplateStore> = Arc::new(FileTemplateStore::open(&path).unwrap());
        assert_eq!(store.len(), demo_templates().len() - 1);
        assert!(store.get("growth-area").is_none());

        let stack = Stack::with_store(store, INTERVAL, EngineConfig::default());
        let rendered = stack
            .service
            .render_chart("trend-line", &Params::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rendered.option["series"][0]["data"], json!([2.1, 3.4, 2.8, 4.2, 5.0]));
    }

    // =========================================================================
    // CUSTOM ADAPTERS
    // =========================================================================

    #[tokio::test]
    async fn test_runtime_registered_adapter_sees_params() {
        let stack = Stack::demo(INTERVAL);
        stack.registry.register(Arc::new(RegionAdapter));
        stack.store.save(region_template()).unwrap();

        let mut params = Params::new();
        params.insert("region".to_string(), json!("EMEA"));

        let rendered = stack
            .service
            .render_chart("region-title", &params)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rendered.option, json!({ "title": { "text": "EMEA" } }));
    }

    #[tokio::test]
    async fn test_adapter_error_surfaces_binding() {
        let stack = Stack::demo(INTERVAL);
        stack.registry.register(Arc::new(RegionAdapter));
        stack.store.save(region_template()).unwrap();

        let err = stack
            .service
            .render_chart("region-title", &Params::new())
            .await
            .unwrap_err();

        match err {
            RenderError::AdapterExecution { binding, .. } => assert_eq!(binding, "region"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
