//! Outbound Ports (Driven Ports / SPI)
//!
//! The engine reaches data sources only through the `DataSourceAdapter`
//! capability held in an `AdapterRegistry`, and templates only through a
//! `TemplateStore`.

pub use ac_01_datasource::{AdapterRegistry, AdapterStream, DataSourceAdapter};
pub use ac_02_template_store::TemplateStore;
