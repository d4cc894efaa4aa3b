//! # AnyChart Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── render_benchmarks.rs   # Extraction, splicing and full renders
//! └── src/
//!     └── integration/           # Cross-crate flows
//!         ├── flows.rs           # Store + registry + engine snapshot renders
//!         └── live.rs            # Subscription driver over real adapters
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ac-tests
//!
//! # By category
//! cargo test -p ac-tests integration::flows
//! cargo test -p ac-tests integration::live
//!
//! # Benchmarks
//! cargo bench -p ac-tests
//! ```

pub mod fixtures;
pub mod integration;
