//! # Live Subscription Flows
//!
//! The subscription driver over the real fixture adapter stream:
//!
//! 1. Each upstream tick yields one full re-render
//! 2. Deleting the template ends the live stream
//! 3. Charts without streaming bindings produce an empty stream

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use serde_json::json;
    use tokio::time::timeout;

    use ac_03_render_engine::ChartRenderApi;
    use shared_types::Params;

    use crate::fixtures::Stack;

    const INTERVAL: Duration = Duration::from_millis(10);
    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_fixture_ticks_drive_renders() {
        let stack = Stack::demo(INTERVAL);
        let stream = stack.service.subscribe_chart("sales-bar", &Params::new());

        let updates: Vec<_> = timeout(DEADLINE, stream.take(3).collect())
            .await
            .expect("three live renders");

        assert_eq!(updates.len(), 3);
        for update in updates {
            let rendered = update.unwrap();
            assert_eq!(rendered.id, "sales-bar");
            assert_eq!(rendered.option["series"][0]["data"], json!([100, 150]));
        }
    }

    #[tokio::test]
    async fn test_deleting_template_ends_stream() {
        let stack = Stack::demo(INTERVAL);
        let mut stream = stack.service.subscribe_chart("sales-bar", &Params::new());

        let first = timeout(DEADLINE, stream.next()).await.unwrap();
        assert!(matches!(first, Some(Ok(_))));

        assert!(stack.store.delete("sales-bar").unwrap());

        // Renders already in flight may still arrive before the stream ends.
        let rest: Vec<_> = timeout(DEADLINE, stream.collect()).await.unwrap();
        assert!(rest.iter().all(|update| update.is_ok()));
    }

    #[tokio::test]
    async fn test_static_chart_stream_is_empty() {
        let stack = Stack::demo(INTERVAL);
        let stream = stack.service.subscribe_chart("db-product-sales", &Params::new());

        let updates: Vec<_> = timeout(DEADLINE, stream.collect()).await.unwrap();
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_chart_stream_is_empty() {
        let stack = Stack::demo(INTERVAL);
        let stream = stack.service.subscribe_chart("missing", &Params::new());

        let updates: Vec<_> = timeout(DEADLINE, stream.collect()).await.unwrap();
        assert!(updates.is_empty());
    }
}
