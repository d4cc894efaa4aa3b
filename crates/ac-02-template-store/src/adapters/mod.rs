//! Template store implementations

pub mod file;
pub mod memory;
