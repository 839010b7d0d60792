//! Builders for cache managers.

use std::time::Duration;

use strata_store::{DynamicStore, Store};

use crate::manager::CacheManager;

/// Error returned when a cache manager is misconfigured.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The builder was finished without a single store tier.
    #[error("a cache manager requires at least one store tier")]
    NoTiers,
    /// A zero TTL would expire every entry on write.
    #[error("the default time-to-live must be greater than zero")]
    ZeroTtl,
}

/// Builder for a [`CacheManager`].
///
/// Tiers are probed in the order they are added: add the fastest store first
/// and the slowest last.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use strata::CacheManager;
/// use strata_memory::MemoryStore;
///
/// let cache: CacheManager<String, i32> = CacheManager::builder()
///     .memory()
///     .tier(MemoryStore::with_capacity(100_000))
///     .ttl(Duration::from_secs(300))
///     .build()?;
/// # Ok::<(), strata::BuildError>(())
/// ```
#[derive(Debug)]
pub struct CacheManagerBuilder<K, V> {
    tiers: Vec<DynamicStore<K, V>>,
    default_ttl: Option<Duration>,
}

impl<K, V> Default for CacheManagerBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheManagerBuilder<K, V> {
    /// Creates an empty builder with no tiers and no default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiers: Vec::new(),
            default_ttl: None,
        }
    }

    /// Appends a store as the next-farthest tier.
    #[must_use]
    pub fn tier<T>(mut self, store: T) -> Self
    where
        K: Send + 'static,
        V: 'static,
        T: Store<K, V> + 'static,
    {
        self.tiers.push(DynamicStore::new(store));
        self
    }

    /// Appends an already type-erased store as the next-farthest tier.
    ///
    /// Useful for sharing one store instance between managers.
    #[must_use]
    pub fn dynamic_tier(mut self, store: DynamicStore<K, V>) -> Self {
        self.tiers.push(store);
        self
    }

    /// Appends an unbounded in-memory tier.
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory(self) -> Self
    where
        K: Clone + std::hash::Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.tier(strata_memory::MemoryStore::new())
    }

    /// Sets the manager-level default TTL.
    ///
    /// Entries written without a per-entry TTL expire this long after their
    /// write. Without a default TTL such entries never expire.
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Builds the manager.
    ///
    /// # Errors
    ///
    /// Fails fast on configuration errors: no tiers, or a zero default TTL.
    pub fn build(self) -> Result<CacheManager<K, V>, BuildError> {
        validate(&self.tiers, self.default_ttl)?;
        Ok(CacheManager::from_parts(self.tiers, self.default_ttl))
    }
}

/// Builder for a manager derived from an existing one via
/// [`CacheManager::extend`].
///
/// The derived manager shares the parent's tier instances but gets fresh
/// counters and listeners. The parent's default TTL carries over unless
/// overridden here.
#[derive(Debug)]
pub struct ExtendBuilder<K, V> {
    tiers: Vec<DynamicStore<K, V>>,
    default_ttl: Option<Duration>,
}

impl<K, V> ExtendBuilder<K, V> {
    pub(crate) fn new(tiers: Vec<DynamicStore<K, V>>, default_ttl: Option<Duration>) -> Self {
        Self { tiers, default_ttl }
    }

    /// Appends a store behind the inherited tiers.
    #[must_use]
    pub fn tier<T>(mut self, store: T) -> Self
    where
        K: Send + 'static,
        V: 'static,
        T: Store<K, V> + 'static,
    {
        self.tiers.push(DynamicStore::new(store));
        self
    }

    /// Overrides the inherited default TTL.
    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Removes the inherited default TTL; entries without a per-entry TTL
    /// never expire in the derived manager.
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.default_ttl = None;
        self
    }

    /// Builds the derived manager.
    ///
    /// # Errors
    ///
    /// Fails on a zero default TTL. A derived manager always inherits at
    /// least one tier, so [`BuildError::NoTiers`] cannot occur here.
    pub fn build(self) -> Result<CacheManager<K, V>, BuildError> {
        validate(&self.tiers, self.default_ttl)?;
        Ok(CacheManager::from_parts(self.tiers, self.default_ttl))
    }
}

fn validate<K, V>(
    tiers: &[DynamicStore<K, V>],
    default_ttl: Option<Duration>,
) -> Result<(), BuildError> {
    if tiers.is_empty() {
        return Err(BuildError::NoTiers);
    }
    if default_ttl == Some(Duration::ZERO) {
        return Err(BuildError::ZeroTtl);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_tiers_fails() {
        let result = CacheManagerBuilder::<String, i32>::new().build();
        assert!(matches!(result, Err(BuildError::NoTiers)));
    }

    #[cfg(feature = "memory")]
    #[test]
    fn build_with_zero_ttl_fails() {
        let result = CacheManager::<String, i32>::builder()
            .memory()
            .ttl(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(BuildError::ZeroTtl)));
    }

    #[cfg(feature = "memory")]
    #[test]
    fn build_with_one_tier_succeeds() {
        let cache = CacheManager::<String, i32>::builder()
            .memory()
            .ttl(Duration::from_secs(60))
            .build()
            .expect("builder should succeed");
        assert_eq!(cache.tier_count(), 1);
        assert_eq!(cache.default_ttl(), Some(Duration::from_secs(60)));
    }
}
