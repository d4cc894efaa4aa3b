//! Demo chart templates
//!
//! Fixture-backed bar, line, pie, scatter and area charts, the legacy
//! `sales-2026` chart (binding names differ from placeholder keys), and a
//! database-backed product sales chart on the `local-default` connection.

use serde_json::json;
use shared_types::{Binding, ChartTemplate};
use tracing::info;

use crate::errors::StoreError;
use crate::ports::TemplateStore;

const FIXTURE: &str = "fixture";
const DATABASE: &str = "database";
const TOP_PRODUCTS_SQL: &str =
    "local-default:SELECT product_name, revenue FROM product_sales ORDER BY revenue DESC LIMIT 5";

/// Install the demo templates if the store is empty.
///
/// Returns the number of templates inserted (zero when the store already
/// held data).
pub fn seed_demo_templates(store: &dyn TemplateStore) -> Result<usize, StoreError> {
    let existing = store.len();
    if existing > 0 {
        info!(existing, "Template store not empty, skipping demo seed");
        return Ok(0);
    }

    let templates = demo_templates();
    let count = templates.len();
    for template in templates {
        store.save(template)?;
    }

    info!(count, "Seeded demo templates");
    Ok(count)
}

/// The demo templates, in insertion order.
pub fn demo_templates() -> Vec<ChartTemplate> {
    vec![
        ChartTemplate::new(
            "sales-bar",
            "Sales (bar)",
            "bar",
            json!({
                "title": { "text": "Sales" },
                "tooltip": { "trigger": "axis" },
                "legend": { "data": ["Units"] },
                "xAxis": { "type": "category", "data": "{{binding:categories}}" },
                "yAxis": { "type": "value" },
                "series": [{ "name": "Units", "type": "bar", "data": "{{binding:series1}}" }]
            }),
        )
        .with_binding(Binding::new("categories", FIXTURE, "fixture:sales", "$.items[*].date", "categories"))
        .with_binding(
            Binding::new("series1", FIXTURE, "fixture:sales", "$.items[*].value", "series1").streaming(),
        ),
        ChartTemplate::new(
            "trend-line",
            "Trend (line)",
            "line",
            json!({
                "title": { "text": "Trend analysis" },
                "tooltip": { "trigger": "axis" },
                "legend": { "data": ["Growth rate"] },
                "xAxis": { "type": "category", "boundaryGap": false, "data": "{{binding:categories}}" },
                "yAxis": { "type": "value" },
                "series": [{ "name": "Growth rate", "type": "line", "data": "{{binding:series1}}", "smooth": true }]
            }),
        )
        .with_binding(Binding::new("categories", FIXTURE, "fixture:trend", "$.items[*].date", "categories"))
        .with_binding(Binding::new("series1", FIXTURE, "fixture:trend", "$.items[*].value", "series1")),
        ChartTemplate::new(
            "distribution-pie",
            "Distribution (pie)",
            "pie",
            json!({
                "title": { "text": "Share by channel", "left": "center" },
                "tooltip": { "trigger": "item" },
                "legend": { "orient": "vertical", "left": "left" },
                "series": [{ "type": "pie", "radius": "50%", "data": "{{binding:pieData}}" }]
            }),
        )
        .with_binding(Binding::new("pieData", FIXTURE, "fixture:distribution", "$.items[*]", "pieData")),
        ChartTemplate::new(
            "correlation-scatter",
            "Correlation (scatter)",
            "scatter",
            json!({
                "title": { "text": "Correlation" },
                "tooltip": {},
                "xAxis": { "name": "X", "type": "value" },
                "yAxis": { "name": "Y", "type": "value" },
                "series": [{ "type": "scatter", "symbolSize": 20, "data": "{{binding:scatterData}}" }]
            }),
        )
        .with_binding(Binding::new("scatterData", FIXTURE, "fixture:correlation", "$.items[*]", "scatterData")),
        ChartTemplate::new(
            "growth-area",
            "Cumulative growth (area)",
            "area",
            json!({
                "title": { "text": "Cumulative growth" },
                "tooltip": { "trigger": "axis" },
                "xAxis": { "type": "category", "boundaryGap": false, "data": "{{binding:categories}}" },
                "yAxis": { "type": "value" },
                "series": [{ "name": "Total", "type": "line", "areaStyle": {}, "data": "{{binding:series1}}" }]
            }),
        )
        .with_binding(Binding::new("categories", FIXTURE, "fixture:growth", "$.items[*].date", "categories"))
        .with_binding(Binding::new("series1", FIXTURE, "fixture:growth", "$.items[*].value", "series1")),
        ChartTemplate::new(
            "sales-2026",
            "Sales",
            "bar",
            json!({
                "title": { "text": "Sales" },
                "xAxis": { "data": "{{binding:categories}}" },
                "yAxis": {},
                "series": [{ "type": "bar", "data": "{{binding:series1}}" }]
            }),
        )
        .with_binding(Binding::new("ds1", FIXTURE, "mock:sales", "$.items[*].date", "categories"))
        .with_binding(Binding::new("ds2", FIXTURE, "mock:sales", "$.items[*].value", "series1")),
        ChartTemplate::new(
            "db-product-sales",
            "Product sales (database)",
            "bar",
            json!({
                "title": { "text": "Product sales" },
                "tooltip": { "trigger": "axis" },
                "legend": {},
                "xAxis": { "type": "category", "data": "{{binding:products}}" },
                "yAxis": { "type": "value", "name": "Revenue" },
                "series": [{ "name": "Revenue", "type": "bar", "data": "{{binding:revenue}}" }]
            }),
        )
        .with_binding(Binding::new("products", DATABASE, TOP_PRODUCTS_SQL, "$.items[*].product_name", "products"))
        .with_binding(Binding::new("revenue", DATABASE, TOP_PRODUCTS_SQL, "$.items[*].revenue", "revenue")),
    ]
}
