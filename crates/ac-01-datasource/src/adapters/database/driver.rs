//! Blocking SQL driver port and an in-memory implementation

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::connections::DatabaseConnection;
use crate::domain::errors::AdapterError;

/// One result row, column name → value.
pub type Row = Map<String, Value>;

/// Synchronous SQL execution.
///
/// Called only from the database adapter's blocking pool, never on the
/// async scheduler.
pub trait SqlDriver: Send + Sync + 'static {
    fn query(&self, connection: &DatabaseConnection, sql: &str) -> Result<Vec<Row>, AdapterError>;
}

/// Driver answering from fixed tables and canned statements.
///
/// `SELECT * FROM <table>` reads a registered table; any other statement
/// must match a registered statement after whitespace normalization.
#[derive(Default)]
pub struct StaticSqlDriver {
    tables: HashMap<String, Vec<Row>>,
    statements: HashMap<String, Vec<Row>>,
}

impl StaticSqlDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table readable with `SELECT * FROM <name>`.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.tables.insert(name.into().to_lowercase(), rows);
        self
    }

    /// Register the rows returned for an exact statement.
    #[must_use]
    pub fn with_statement(mut self, sql: &str, rows: Vec<Row>) -> Self {
        self.statements.insert(normalize(sql), rows);
        self
    }

    /// Demo data: a `product_sales` table and its top-five query.
    pub fn demo() -> Self {
        let rows: Vec<Row> = [
            ("Laptop", 48_200),
            ("Monitor", 23_150),
            ("Keyboard", 9_870),
            ("Headset", 7_640),
            ("Mouse", 5_320),
            ("Webcam", 2_110),
        ]
        .iter()
        .map(|(name, revenue)| row(&[("product_name", Value::from(*name)), ("revenue", Value::from(*revenue))]))
        .collect();

        let top_five = rows.iter().take(5).cloned().collect();

        Self::new().with_table("product_sales", rows).with_statement(
            "SELECT product_name, revenue FROM product_sales ORDER BY revenue DESC LIMIT 5",
            top_five,
        )
    }
}

impl SqlDriver for StaticSqlDriver {
    fn query(&self, connection: &DatabaseConnection, sql: &str) -> Result<Vec<Row>, AdapterError> {
        let normalized = normalize(sql);

        if let Some(rows) = self.statements.get(&normalized) {
            return Ok(rows.clone());
        }

        let upper = normalized.to_uppercase();
        if let Some(table) = upper.strip_prefix("SELECT * FROM ") {
            if let Some(rows) = self.tables.get(&table.trim().to_lowercase()) {
                return Ok(rows.clone());
            }
        }

        Err(AdapterError::execution(
            "database",
            format!("statement not supported on {}: {sql}", connection.id),
        ))
    }
}

/// Build a row from column/value pairs.
pub fn row(columns: &[(&str, Value)]) -> Row {
    columns
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> DatabaseConnection {
        DatabaseConnection::new("local", "Local", "memory://local")
    }

    #[test]
    fn test_table_read() {
        let driver = StaticSqlDriver::demo();
        let rows = driver.query(&connection(), "select *  from PRODUCT_SALES").unwrap();
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_registered_statement_whitespace_insensitive() {
        let driver = StaticSqlDriver::demo();
        let rows = driver
            .query(
                &connection(),
                "SELECT product_name, revenue\n  FROM product_sales ORDER BY revenue DESC LIMIT 5",
            )
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["product_name"], "Laptop");
    }

    #[test]
    fn test_unknown_statement_fails() {
        let driver = StaticSqlDriver::demo();
        let err = driver.query(&connection(), "SELECT 1").unwrap_err();
        assert!(matches!(err, AdapterError::Execution { .. }));
    }
}
