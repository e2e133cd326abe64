//! Local key-value storage for RocketShoes.
//!
//! A native stand-in for browser local storage: string values under string
//! keys, either in memory or persisted to a JSON file, with a typed
//! [`Cache`] wrapper for automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".rocketshoes/storage.json")?);
//!
//! cache.set("@RocketShoes:cart", &cart)?;
//! let cart: Option<Vec<Product>> = cache.get("@RocketShoes:cart")?;
//! ```

mod error;
mod file;
mod kv;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use store::{KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
