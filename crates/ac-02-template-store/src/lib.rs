//! # Template Store (ac-02)
//!
//! Key-value storage for chart templates. The render engine only reads
//! through the `TemplateStore` port; every `get` hands out a clone, so a
//! render works on a snapshot that later writes cannot change.
//!
//! ## Implementations
//!
//! - `InMemoryTemplateStore`: `RwLock<HashMap>`, lost on restart.
//! - `FileTemplateStore`: same map, rewritten to a JSON file on every
//!   mutation (atomic temp-file rename).
//!
//! Both validate templates on `save`.

pub mod adapters;
pub mod errors;
pub mod ports;
pub mod seed;

pub use adapters::file::FileTemplateStore;
pub use adapters::memory::InMemoryTemplateStore;
pub use errors::StoreError;
pub use ports::TemplateStore;
pub use seed::{demo_templates, seed_demo_templates};
