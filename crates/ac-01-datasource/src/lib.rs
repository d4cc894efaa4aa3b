//! # Data Sources (ac-01)
//!
//! The capability contract every data-source adapter implements, the
//! process-wide adapter registry, and the reference adapters.
//!
//! ## Capability Contract
//!
//! | Operation | Shape | Notes |
//! |-----------|-------|-------|
//! | `execute(query, params)` | async, one result | fails with `AdapterError` |
//! | `subscribe(query, params)` | lazy, cold, unbounded stream | may never yield |
//! | `id()` | stable string | registry key |
//!
//! ## Reference Adapters
//!
//! - **Fixture** (`fixture`): canned payloads selected by query, timed events.
//! - **REST** (`rest`): query is a URL, GET + JSON parse, never streams.
//! - **Database** (`database`): `<connectionId>:<table-or-SQL>`, blocking
//!   driver isolated on a bounded pool, subscribe degrades to one execute.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Errors and query parsing, no I/O
//! - `ports/` - The `DataSourceAdapter` capability trait
//! - `adapters/` - Reference adapter implementations
//! - `registry.rs` - Id → adapter mapping

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod registry;

pub use adapters::database::{
    ConnectionCatalog, DatabaseAdapter, DatabaseConnection, Row, SqlDriver, StaticSqlDriver,
};
pub use adapters::fixture::FixtureAdapter;
pub use adapters::rest::RestAdapter;
pub use config::DatasourceConfig;
pub use domain::errors::AdapterError;
pub use domain::query::{substitute_variables, DatabaseQuery, Statement};
pub use ports::{AdapterStream, DataSourceAdapter};
pub use registry::{register_defaults, AdapterRegistry, LEGACY_ALIASES};
