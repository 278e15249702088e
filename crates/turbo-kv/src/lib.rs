//! Type-safe key-value storage for TurboCart.
//!
//! Provides a small [`KvStore`] abstraction with in-memory, file-backed and
//! (inside Spin components) Spin Key-Value backends, plus a [`Cache`] wrapper
//! with automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_kv::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".cart")?);
//!
//! // Store a value
//! cache.set("turbo-cart:v1", &items)?;
//!
//! // Retrieve a value
//! let items: Option<Vec<Item>> = cache.get("turbo-cart:v1")?;
//!
//! // Delete a value
//! cache.delete("turbo-cart:v1")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::KvError;
pub use kv::Cache;
#[cfg(target_arch = "wasm32")]
pub use store::SpinStore;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KvError, KvStore, MemoryStore};
}
