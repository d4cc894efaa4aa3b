//! # Container
//!
//! Configuration and dependency wiring for the runtime.

pub mod config;
pub mod services;

pub use config::RuntimeConfig;
pub use services::ServiceContainer;
