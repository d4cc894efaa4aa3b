//! Cross-crate integration flows.

pub mod flows;
pub mod live;
