//! In-memory store tier backed by moka.
//!
//! This crate provides [`MemoryStore`], an in-memory cache tier implementing
//! the [`strata_store::Store`] contract, backed by the moka crate for
//! high-performance concurrent caching with eviction policies.
//!
//! # Examples
//!
//! ```
//! use strata_memory::MemoryStore;
//! use strata_store::{Store, StoreEntry};
//! # futures::executor::block_on(async {
//!
//! let store = MemoryStore::<String, i32>::with_capacity(1000);
//!
//! store.set(&"key".to_string(), StoreEntry::new(42)).await?;
//! let value = store.get(&"key".to_string()).await?;
//! assert_eq!(*value.unwrap().value(), 42);
//! # Ok::<(), strata_store::Error>(())
//! # });
//! ```

mod builder;
mod store;

#[doc(inline)]
pub use builder::{ConfigError, MemoryStoreBuilder};
#[doc(inline)]
pub use store::MemoryStore;
