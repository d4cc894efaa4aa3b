//! Domain module for data sources
//!
//! Contains adapter errors and pure query parsing.

pub mod errors;
pub mod query;

pub use errors::*;
pub use query::*;
