//! In-memory store implementation using moka.

use std::hash::Hash;

use moka::future::Cache;
use strata_store::{Error, Store, StoreEntry};

use crate::builder::MemoryStoreBuilder;

/// An in-memory store tier backed by moka.
///
/// This store provides:
/// - Concurrent access with high performance
/// - Automatic eviction based on capacity (`TinyLFU`)
/// - Thread-safe operations
///
/// Cloning a `MemoryStore` is cheap and yields a handle to the same
/// underlying storage.
///
/// # Examples
///
/// ```
/// use strata_memory::MemoryStore;
/// use strata_store::{Store, StoreEntry};
/// # futures::executor::block_on(async {
///
/// let store = MemoryStore::<String, i32>::new();
///
/// store.set(&"key".to_string(), StoreEntry::new(42)).await?;
/// let value = store.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), 42);
/// # Ok::<(), strata_store::Error>(())
/// # });
/// ```
#[derive(Clone)]
pub struct MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, StoreEntry<V>>,
}

impl<K, V> std::fmt::Debug for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new unbounded in-memory store.
    ///
    /// The store will use the default eviction policy (`TinyLFU`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Creates a new in-memory store with a maximum capacity.
    ///
    /// Once the capacity is reached, entries will be evicted using the
    /// `TinyLFU` policy (combination of LRU eviction and LFU admission).
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_memory::MemoryStore;
    ///
    /// let store = MemoryStore::<String, i32>::with_capacity(1000);
    /// ```
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Creates a new builder for configuring an in-memory store.
    ///
    /// The builder exposes time-to-live, time-to-idle, and capacity options,
    /// and validates the configuration when it builds.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder<K, V> {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_cache(inner: Cache<K, StoreEntry<V>>) -> Self {
        Self { inner }
    }
}

impl<K, V> Store<K, V> for MemoryStore<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<StoreEntry<V>>, Error> {
        Ok(self.inner.get(key).await)
    }

    async fn set(&self, key: &K, entry: StoreEntry<V>) -> Result<(), Error> {
        self.inner.insert(key.clone(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<bool, Error> {
        Ok(self.inner.remove(key).await.is_some())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<K>, Error> {
        Ok(self.inner.iter().map(|(key, _)| (*key).clone()).collect())
    }

    fn len(&self) -> Option<u64> {
        // Approximate until moka's pending maintenance tasks run.
        Some(self.inner.entry_count())
    }
}
