//! Pure render logic: errors, extraction, substitution. No I/O.

pub mod errors;
pub mod extraction;
pub mod substitution;
