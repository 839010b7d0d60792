//! Multi-layer cache coordination.
//!
//! `strata` layers an ordered list of store tiers into one logical cache:
//! reads probe the nearest tier first and promote hits forward, writes fan
//! out to every tier, and a failing tier degrades the cache instead of
//! breaking it.
//!
//! The building blocks:
//!
//! - [`CacheManager`] coordinates the tiers: layered reads with promotion,
//!   concurrent fan-out writes, TTL expiry, operation counters, and typed
//!   lifecycle events.
//! - [`AsyncCacheManager`] adds an upstream data function for read-through
//!   loading, with collapsing of concurrent fetches and fetch timing
//!   statistics.
//! - [`PromiseCache`] caches a single future so concurrent callers share one
//!   generation and a settled value is reused until it goes stale.
//! - [`canonical_key`] builds order-independent string keys from named
//!   fields.
//!
//! Tiers implement the [`Store`] trait from `strata_store`; the `memory`
//! feature (enabled by default) pulls in the moka-backed in-memory tier from
//! `strata_memory`.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use strata::CacheManager;
//! use strata_memory::MemoryStore;
//! # futures::executor::block_on(async {
//!
//! // A small fast tier in front of a large one, with a five minute TTL.
//! let cache: CacheManager<String, String> = CacheManager::builder()
//!     .tier(MemoryStore::with_capacity(1_000))
//!     .tier(MemoryStore::with_capacity(1_000_000))
//!     .ttl(Duration::from_secs(300))
//!     .build()?;
//!
//! cache.set(&"greeting".to_string(), "hello".to_string()).await;
//! assert_eq!(
//!     cache.get(&"greeting".to_string()).await,
//!     Some("hello".to_string()),
//! );
//! # Ok::<(), strata::BuildError>(())
//! # });
//! ```

mod builder;
mod events;
mod key;
mod loader;
mod manager;
mod metadata;
mod promise;

#[doc(inline)]
pub use builder::{BuildError, CacheManagerBuilder, ExtendBuilder};
#[doc(inline)]
pub use events::{CacheEvent, EventKind};
#[doc(inline)]
pub use key::canonical_key;
#[doc(inline)]
pub use loader::{AsyncCacheManager, AsyncCacheManagerBuilder, DataFn, LoadCallbacks};
#[doc(inline)]
pub use manager::CacheManager;
#[doc(inline)]
pub use metadata::{AsyncCacheMetadata, CacheMetadata, FetchStats};
#[doc(inline)]
pub use promise::PromiseCache;

pub use strata_store::{DynamicStore, Error, IntoDynamicStore, Result, Store, StoreEntry};

#[cfg(feature = "memory")]
pub use strata_memory::{ConfigError, MemoryStore, MemoryStoreBuilder};
