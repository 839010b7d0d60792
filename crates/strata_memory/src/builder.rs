//! Validated configuration for in-memory stores.

use std::{hash::Hash, marker::PhantomData, time::Duration};

use moka::future::Cache;

use crate::store::MemoryStore;

/// Error returned when a memory store is misconfigured.
///
/// Configuration problems surface at build time, not as surprising runtime
/// behavior: a zero capacity would admit nothing, and a zero expiry duration
/// would expire every entry on insert.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `max_capacity` was zero; the store could never hold an entry.
    #[error("max_capacity must be greater than zero")]
    ZeroCapacity,
    /// `time_to_live` was zero; every entry would expire on insert.
    #[error("time_to_live must be greater than zero")]
    ZeroTimeToLive,
    /// `time_to_idle` was zero; every entry would expire on insert.
    #[error("time_to_idle must be greater than zero")]
    ZeroTimeToIdle,
}

/// Builder for a [`MemoryStore`].
///
/// Collects eviction and expiry settings, validates them, and assembles the
/// underlying moka cache without exposing moka's types. Tier-level expiry set
/// here is enforced inside the tier, independently of any per-entry TTL or
/// manager-level default applied by the coordination layer on read.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use strata_memory::MemoryStore;
///
/// let store = MemoryStore::<String, i32>::builder()
///     .max_capacity(1000)
///     .time_to_idle(Duration::from_secs(60))
///     .name("sessions")
///     .build()?;
/// # Ok::<(), strata_memory::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder<K, V> {
    max_capacity: Option<u64>,
    initial_capacity: Option<usize>,
    time_to_live: Option<Duration>,
    time_to_idle: Option<Duration>,
    name: Option<String>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Default for MemoryStoreBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStoreBuilder<K, V> {
    /// Creates a builder for an unbounded store with no tier-level expiry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            time_to_live: None,
            time_to_idle: None,
            name: None,
            _marker: PhantomData,
        }
    }

    /// Bounds the store to `capacity` entries, evicted with `TinyLFU`.
    ///
    /// Must be nonzero. Unset means unbounded.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Pre-allocates room for roughly `capacity` entries.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Expires entries a fixed duration after insertion, regardless of
    /// access. Must be nonzero.
    #[must_use]
    pub fn time_to_live(mut self, duration: Duration) -> Self {
        self.time_to_live = Some(duration);
        self
    }

    /// Expires entries after a period without reads or writes; each access
    /// resets the timer. Must be nonzero.
    #[must_use]
    pub fn time_to_idle(mut self, duration: Duration) -> Self {
        self.time_to_idle = Some(duration);
        self
    }

    /// Names the store for logs and debugging output.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Validates the configuration and builds the store.
    ///
    /// # Errors
    ///
    /// Fails fast when `max_capacity`, `time_to_live`, or `time_to_idle` is
    /// zero.
    pub fn build(self) -> Result<MemoryStore<K, V>, ConfigError>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        if self.max_capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.time_to_live == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeToLive);
        }
        if self.time_to_idle == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeToIdle);
        }

        let mut cache = Cache::builder();
        if let Some(capacity) = self.max_capacity {
            cache = cache.max_capacity(capacity);
        }
        if let Some(capacity) = self.initial_capacity {
            cache = cache.initial_capacity(capacity);
        }
        if let Some(ttl) = self.time_to_live {
            cache = cache.time_to_live(ttl);
        }
        if let Some(tti) = self.time_to_idle {
            cache = cache.time_to_idle(tti);
        }
        if let Some(name) = self.name.as_deref() {
            cache = cache.name(name);
        }

        Ok(MemoryStore::from_cache(cache.build()))
    }
}
