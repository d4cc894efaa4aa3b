//! # Database Adapter
//!
//! Query format: `<connectionId>:<table-or-SQL>`. A bare table name reads
//! the whole table; a `SELECT` statement runs as written after `${var}`
//! substitution. The result is `{"items": [rows...], "count": n}`.
//!
//! The SQL driver is synchronous. Calls run through `spawn_blocking`,
//! gated by a semaphore sized from `DatasourceConfig::blocking_pool_size`,
//! so slow queries never stall the async scheduler or other renders.

mod connections;
mod driver;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use serde_json::{json, Value};
use shared_types::Params;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::errors::AdapterError;
use crate::domain::query::DatabaseQuery;
use crate::ports::{AdapterStream, DataSourceAdapter};

pub use connections::{ConnectionCatalog, DatabaseConnection};
pub use driver::{row, Row, SqlDriver, StaticSqlDriver};

/// SQL adapter backed by a blocking driver.
#[derive(Clone)]
pub struct DatabaseAdapter {
    catalog: Arc<ConnectionCatalog>,
    driver: Arc<dyn SqlDriver>,
    permits: Arc<Semaphore>,
}

impl DatabaseAdapter {
    /// Registry id.
    pub const ID: &'static str = "database";

    pub fn new(
        catalog: Arc<ConnectionCatalog>,
        driver: Arc<dyn SqlDriver>,
        blocking_pool_size: usize,
    ) -> Self {
        Self {
            catalog,
            driver,
            permits: Arc::new(Semaphore::new(blocking_pool_size.max(1))),
        }
    }

    /// Connection catalog used to resolve query connection ids.
    pub fn catalog(&self) -> &Arc<ConnectionCatalog> {
        &self.catalog
    }

    async fn run(&self, query: String, params: Params) -> Result<Value, AdapterError> {
        let parsed = DatabaseQuery::parse(&query)?;
        let sql = parsed.render_sql(&params);

        let connection = self
            .catalog
            .get(&parsed.connection_id)
            .ok_or_else(|| AdapterError::UnknownConnection(parsed.connection_id.clone()))?;
        if !connection.active {
            return Err(AdapterError::InactiveConnection(connection.id));
        }

        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AdapterError::PoolClosed)?;

        debug!(connection_id = %connection.id, sql = %sql, "Running database query");

        let driver = Arc::clone(&self.driver);
        let rows = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            driver.query(&connection, &sql)
        })
        .await
        .map_err(|e| AdapterError::Task(e.to_string()))?
        .inspect_err(|e| warn!(error = %e, "Database query failed"))?;

        let count = rows.len();
        Ok(json!({ "items": rows, "count": count }))
    }
}

#[async_trait]
impl DataSourceAdapter for DatabaseAdapter {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn execute(&self, query: &str, params: &Params) -> Result<Value, AdapterError> {
        self.run(query.to_string(), params.clone()).await
    }

    /// One event carrying a fresh execute, then the stream ends.
    fn subscribe(&self, query: &str, params: &Params) -> AdapterStream {
        let adapter = self.clone();
        let query = query.to_string();
        let params = params.clone();
        Box::pin(stream::once(async move { adapter.run(query, params).await }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn adapter() -> DatabaseAdapter {
        DatabaseAdapter::new(
            Arc::new(ConnectionCatalog::with_default()),
            Arc::new(StaticSqlDriver::demo()),
            2,
        )
    }

    #[tokio::test]
    async fn test_table_query_shape() {
        let result = adapter()
            .execute("local-default:product_sales", &Params::new())
            .await
            .unwrap();
        assert_eq!(result["count"], 6);
        assert_eq!(result["items"].as_array().unwrap().len(), 6);
        assert_eq!(result["items"][0]["product_name"], "Laptop");
    }

    #[tokio::test]
    async fn test_select_with_variables() {
        let mut params = Params::new();
        params.insert("limit".into(), json!(5));

        let result = adapter()
            .execute(
                "local-default:SELECT product_name, revenue FROM product_sales ORDER BY revenue DESC LIMIT ${limit}",
                &params,
            )
            .await
            .unwrap();
        assert_eq!(result["count"], 5);
    }

    #[tokio::test]
    async fn test_unknown_connection() {
        let err = adapter()
            .execute("missing:product_sales", &Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::UnknownConnection(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_inactive_connection() {
        let adapter = adapter();
        let mut connection = DatabaseConnection::new("off", "Off", "memory://off");
        connection.active = false;
        adapter.catalog().save(connection);

        let err = adapter
            .execute("off:product_sales", &Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InactiveConnection(_)));
    }

    #[tokio::test]
    async fn test_malformed_query() {
        let err = adapter()
            .execute("product_sales", &Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn test_subscribe_yields_once() {
        let events: Vec<_> = adapter()
            .subscribe("local-default:product_sales", &Params::new())
            .collect()
            .await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap()["count"], 6);
    }

    /// Driver that records peak concurrency.
    struct SlowDriver {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SqlDriver for SlowDriver {
        fn query(&self, _: &DatabaseConnection, _: &str) -> Result<Vec<Row>, AdapterError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_pool_is_bounded() {
        let driver = Arc::new(SlowDriver {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let adapter = DatabaseAdapter::new(
            Arc::new(ConnectionCatalog::with_default()),
            driver.clone(),
            2,
        );

        let params = Params::new();
        let calls = (0..6).map(|_| adapter.execute("local-default:t", &params));
        let results = futures::future::join_all(calls).await;

        assert!(results.iter().all(Result::is_ok));
        assert!(driver.peak.load(Ordering::SeqCst) <= 2);
    }
}
