//! # Shared Types Crate
//!
//! This crate contains the chart data model used by every stage of the render
//! pipeline: templates, bindings, placeholder tokens and rendered options.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate chart types are defined here.
//! - **Snapshot Semantics**: A `ChartTemplate` is an immutable value for the
//!   duration of one render; stores hand out clones.
//! - **Unambiguous Substitution**: `ChartTemplate::validate` rejects templates
//!   whose bindings collide on `name` or `placeholder_key`.

pub mod entities;
pub mod errors;
pub mod placeholder;

pub use entities::*;
pub use errors::*;
pub use placeholder::{placeholder_key, placeholder_token, PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX};
