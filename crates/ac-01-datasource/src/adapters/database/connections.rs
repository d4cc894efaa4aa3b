//! Connection catalog for the database adapter

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A named database connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnection {
    pub id: String,
    pub name: String,
    pub url: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Driver identifier, informational.
    pub driver: String,
    pub active: bool,
}

impl DatabaseConnection {
    /// Create an active connection with no credentials.
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            username: String::new(),
            password: String::new(),
            driver: "static".to_string(),
            active: true,
        }
    }
}

/// In-memory connection registry.
#[derive(Default)]
pub struct ConnectionCatalog {
    connections: RwLock<HashMap<String, DatabaseConnection>>,
}

impl ConnectionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the connection installed by `with_default`.
    pub const DEFAULT_CONNECTION: &'static str = "local-default";

    /// Catalog holding one active local connection.
    pub fn with_default() -> Self {
        let catalog = Self::new();
        catalog.save(DatabaseConnection::new(
            Self::DEFAULT_CONNECTION,
            "Local demo database",
            "memory://local-default",
        ));
        catalog
    }

    pub fn get(&self, id: &str) -> Option<DatabaseConnection> {
        self.connections.read().get(id).cloned()
    }

    /// Insert or replace a connection.
    pub fn save(&self, connection: DatabaseConnection) {
        info!(connection_id = %connection.id, "Saving database connection");
        self.connections
            .write()
            .insert(connection.id.clone(), connection);
    }

    /// Remove a connection; returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        self.connections.write().remove(id).is_some()
    }

    /// All connections, sorted by id.
    pub fn list(&self) -> Vec<DatabaseConnection> {
        let mut all: Vec<_> = self.connections.read().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
