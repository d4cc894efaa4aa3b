//! # Render Engine (ac-03)
//!
//! Turns a stored chart template into a resolved chart option.
//!
//! ## Pipeline
//!
//! ```text
//! template ──► resolve adapters ──► fan-out execute ──► fail-fast join
//!                                                          │
//!         RenderedOption ◄── splice ◄── extract (JSONPath) ◄┘
//! ```
//!
//! Every fetch is bounded by a per-adapter timeout. The first failure
//! drops every other in-flight fetch. Substitution splices values into the
//! parsed option tree; only string nodes that are exactly one
//! `{{binding:<key>}}` token are replaced.
//!
//! ## Live Mode
//!
//! `subscribe_chart` watches the template's streaming binding(s) and emits
//! a full re-render for every upstream event. See `application::subscription`.
//!
//! ## Architecture
//!
//! - **Domain**: errors, JSONPath extraction, tree splicing
//! - **Ports**: Inbound (`ChartRenderApi`) and Outbound (adapter registry, template store)
//! - **Application**: `ChartRenderService` and the subscription driver

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::service::ChartRenderService;
pub use application::subscription::{ChartStream, ChartUpdate};
pub use config::{EngineConfig, OverlapPolicy, RenderConfig, StreamSelection, SubscriptionConfig};
pub use domain::errors::{ExtractionError, RenderError};
pub use domain::extraction::{extract, JsonPath};
pub use domain::substitution::splice;
pub use ports::inbound::ChartRenderApi;
