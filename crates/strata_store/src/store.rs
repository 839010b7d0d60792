//! The core trait for cache storage backends.
//!
//! [`Store`] defines the interface that all backing stores must implement.
//! This trait is designed for composition: implement the storage operations,
//! then use `strata` to layer tier ordering, hit promotion, metadata, and
//! cache-aside loading on top.

use crate::{Error, StoreEntry};

/// Trait for cache store implementations.
///
/// Implement this trait to create custom cache backends. The coordination
/// layer treats each store as one tier in an ordered list; no shared state
/// or atomicity between tiers is ever assumed.
///
/// The four core methods are required: `get`, `set`, `delete`, and `clear`.
/// The remaining methods have default implementations:
/// - `keys`: returns an empty list (not every backend can enumerate)
/// - `len`: returns `None` (not all stores track size)
/// - `is_empty`: delegates to `len`
/// - `disconnect`: no-op teardown
pub trait Store<K, V>: Send + Sync {
    /// Gets a value, returning an error if the operation fails.
    ///
    /// A plain miss is `Ok(None)`, never an error.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<StoreEntry<V>>, Error>> + Send;

    /// Writes a value, overwriting unconditionally.
    fn set(&self, key: &K, entry: StoreEntry<V>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Deletes a value, returning whether the key existed.
    fn delete(&self, key: &K) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Clears all entries, returning an error if the operation fails.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the keys currently visible in this store.
    ///
    /// Backends that cannot enumerate their keys return an empty list and
    /// simply contribute nothing to a union across tiers.
    fn keys(&self) -> impl Future<Output = Result<Vec<K>, Error>> + Send
    where
        K: Send,
    {
        std::future::ready(Ok(Vec::new()))
    }

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the store contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }

    /// Releases any resources held by this store.
    ///
    /// Stores without teardown needs keep the default no-op. Implementations
    /// must tolerate being called more than once.
    fn disconnect(&self) -> impl Future<Output = Result<(), Error>> + Send {
        std::future::ready(Ok(()))
    }
}
