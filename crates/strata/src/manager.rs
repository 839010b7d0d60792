//! Multi-tier cache coordination.

use std::{
    collections::HashSet,
    hash::Hash,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::future::join_all;
use strata_store::{DynamicStore, Error, Store, StoreEntry};
use tokio::time::Instant;

use crate::{
    builder::ExtendBuilder,
    events::{CacheEvent, EventKind, EventListeners},
    metadata::{CacheMetadata, Counters},
};

/// Coordinates an ordered list of store tiers as one logical cache.
///
/// Tiers are ordered nearest-first: reads probe tier 0, then tier 1, and so
/// on; a hit in a farther tier is promoted into every nearer tier before it
/// is returned. Writes, deletes, and clears fan out to all tiers
/// concurrently. A failing tier never fails the operation as a whole: the
/// failure is counted, logged, and the remaining tiers proceed.
///
/// No atomicity across tiers is assumed or provided. Concurrent writers can
/// leave tiers temporarily disagreeing; reads resolve the disagreement in
/// tier order.
///
/// Cloning a `CacheManager` yields a handle to the same cache: tiers,
/// counters, and listeners are all shared.
///
/// # Examples
///
/// ```
/// use strata::CacheManager;
/// # futures::executor::block_on(async {
///
/// let cache: CacheManager<String, i32> = CacheManager::builder().memory().build()?;
///
/// cache.set(&"answer".to_string(), 42).await;
/// assert_eq!(cache.get(&"answer".to_string()).await, Some(42));
/// # Ok::<(), strata::BuildError>(())
/// # });
/// ```
pub struct CacheManager<K, V> {
    tiers: Vec<DynamicStore<K, V>>,
    default_ttl: Option<Duration>,
    counters: Arc<Counters>,
    listeners: Arc<EventListeners<K, V>>,
    disconnected: Arc<AtomicBool>,
}

impl<K, V> Clone for CacheManager<K, V> {
    fn clone(&self) -> Self {
        Self {
            tiers: self.tiers.clone(),
            default_ttl: self.default_ttl,
            counters: Arc::clone(&self.counters),
            listeners: Arc::clone(&self.listeners),
            disconnected: Arc::clone(&self.disconnected),
        }
    }
}

impl<K, V> std::fmt::Debug for CacheManager<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("tiers", &self.tiers.len())
            .field("default_ttl", &self.default_ttl)
            .field("counters", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}

impl<K, V> CacheManager<K, V> {
    /// Creates a builder for configuring a cache manager.
    #[must_use]
    pub fn builder() -> crate::CacheManagerBuilder<K, V> {
        crate::CacheManagerBuilder::new()
    }

    pub(crate) fn from_parts(
        tiers: Vec<DynamicStore<K, V>>,
        default_ttl: Option<Duration>,
    ) -> Self {
        Self {
            tiers,
            default_ttl,
            counters: Arc::new(Counters::default()),
            listeners: Arc::new(EventListeners::new()),
            disconnected: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<K, V> CacheManager<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Reads a value, probing tiers nearest-first.
    ///
    /// The first tier holding a live (unexpired) entry wins; that entry is
    /// promoted into every nearer tier before the value is returned. Expired
    /// entries and tier failures are treated as per-tier misses, so a
    /// farther tier can still satisfy the read.
    ///
    /// Promotion is awaited inline, so a read that promotes pays the nearer
    /// tiers' write latency; in exchange, a subsequent read is guaranteed to
    /// see the promoted entry. Promotion failures are absorbed and can never
    /// fail the read itself.
    pub async fn get(&self, key: &K) -> Option<V> {
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.get(key).await {
                Ok(Some(entry)) => {
                    if entry.is_expired(self.default_ttl) {
                        continue;
                    }
                    if index > 0 {
                        self.promote(key, &entry, index).await;
                    }
                    self.counters.record_hit();
                    self.emit(CacheEvent::Get {
                        key: key.clone(),
                        found: true,
                    });
                    return Some(entry.into_value());
                }
                Ok(None) => {}
                Err(error) => self.note_tier_failure("get", index, &error),
            }
        }
        self.counters.record_miss();
        self.emit(CacheEvent::Get {
            key: key.clone(),
            found: false,
        });
        None
    }

    /// Reads several keys concurrently. The result vector is positionally
    /// aligned with `keys`.
    pub async fn mget(&self, keys: &[K]) -> Vec<Option<V>> {
        join_all(keys.iter().map(|key| self.get(key))).await
    }

    /// Writes a value to every tier concurrently.
    ///
    /// The entry carries no per-entry TTL, so the manager's default TTL (if
    /// any) governs its expiry.
    pub async fn set(&self, key: &K, value: V) {
        self.write(key, value, None).await;
    }

    /// Writes a value to every tier with a per-entry TTL that overrides the
    /// manager's default.
    pub async fn set_with_ttl(&self, key: &K, value: V, ttl: Duration) {
        self.write(key, value, Some(ttl)).await;
    }

    /// Writes several key-value pairs concurrently.
    pub async fn mset(&self, pairs: &[(K, V)]) {
        join_all(
            pairs
                .iter()
                .map(|(key, value)| self.set(key, value.clone())),
        )
        .await;
    }

    /// Deletes a key from every tier concurrently.
    ///
    /// Returns `true` if any tier held the key.
    pub async fn del(&self, key: &K) -> bool {
        let deletes = self
            .tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| async move { (index, tier.delete(key).await) });

        let mut existed = false;
        let mut first_error = None;
        for (index, result) in join_all(deletes).await {
            match result {
                Ok(was_present) => existed |= was_present,
                Err(error) => {
                    self.note_tier_failure("del", index, &error);
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        self.counters.record_deleted();
        self.emit(CacheEvent::Del {
            key: key.clone(),
            error: first_error,
        });
        existed
    }

    /// Deletes several keys concurrently. The result vector is positionally
    /// aligned with `keys`.
    pub async fn mdel(&self, keys: &[K]) -> Vec<bool> {
        join_all(keys.iter().map(|key| self.del(key))).await
    }

    /// Clears every tier concurrently.
    pub async fn clear(&self) {
        let clears = self
            .tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| async move { (index, tier.clear().await) });

        for (index, result) in join_all(clears).await {
            if let Err(error) = result {
                self.note_tier_failure("clear", index, &error);
            }
        }

        self.counters.record_cleared();
        self.emit(CacheEvent::Clear);
    }

    /// Cache-aside read: returns the cached value, or runs `supplier` to
    /// produce it, caches the result, and returns it.
    ///
    /// A supplier failure is wrapped into [`Error`] with the original cause
    /// reachable through `source()`; nothing is cached on failure.
    pub async fn wrap<E, Fut>(&self, key: &K, supplier: impl FnOnce() -> Fut) -> Result<V, Error>
    where
        E: std::error::Error + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>>,
    {
        self.wrap_inner(key, None, supplier).await
    }

    /// Like [`wrap`](Self::wrap), but a freshly produced value is cached with
    /// a per-entry TTL.
    pub async fn wrap_with_ttl<E, Fut>(
        &self,
        key: &K,
        ttl: Duration,
        supplier: impl FnOnce() -> Fut,
    ) -> Result<V, Error>
    where
        E: std::error::Error + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>>,
    {
        self.wrap_inner(key, Some(ttl), supplier).await
    }

    async fn wrap_inner<E, Fut>(
        &self,
        key: &K,
        ttl: Option<Duration>,
        supplier: impl FnOnce() -> Fut,
    ) -> Result<V, Error>
    where
        E: std::error::Error + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }
        let value = supplier().await.map_err(Error::with_source)?;
        self.write(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Returns the union of keys across all tiers, nearest tier first.
    ///
    /// Duplicates are reported once, in the order of the nearest tier that
    /// holds them. Tiers that cannot enumerate contribute nothing.
    pub async fn keys(&self) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.keys().await {
                Ok(tier_keys) => {
                    for key in tier_keys {
                        if seen.insert(key.clone()) {
                            keys.push(key);
                        }
                    }
                }
                Err(error) => self.note_tier_failure("keys", index, &error),
            }
        }
        keys
    }

    /// Returns the remaining time-to-live for a key.
    ///
    /// Tiers are consulted nearest-first; the first live entry with a defined
    /// TTL (per-entry or manager default) decides. Returns `None` when no
    /// tier holds the key or the entry never expires.
    pub async fn ttl(&self, key: &K) -> Option<Duration> {
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.get(key).await {
                Ok(Some(entry)) => {
                    if entry.is_expired(self.default_ttl) {
                        continue;
                    }
                    if let Some(remaining) = entry.remaining_ttl(self.default_ttl) {
                        return Some(remaining);
                    }
                }
                Ok(None) => {}
                Err(error) => self.note_tier_failure("ttl", index, &error),
            }
        }
        None
    }

    /// Returns `true` if any tier holds a live entry for `key`.
    ///
    /// Unlike [`get`](Self::get), this neither promotes the entry nor touches
    /// the hit and miss counters.
    pub async fn contains(&self, key: &K) -> bool {
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.get(key).await {
                Ok(Some(entry)) if !entry.is_expired(self.default_ttl) => return true,
                Ok(_) => {}
                Err(error) => self.note_tier_failure("contains", index, &error),
            }
        }
        false
    }

    /// Registers a listener for one event family.
    ///
    /// Listeners run synchronously on the task that triggered the event and
    /// should return quickly.
    pub fn subscribe(
        &self,
        kind: EventKind,
        listener: impl Fn(&CacheEvent<K, V>) + Send + Sync + 'static,
    ) {
        self.listeners.subscribe(kind, listener);
    }

    /// Returns a point-in-time copy of the operation counters.
    #[must_use]
    pub fn metadata(&self) -> CacheMetadata {
        self.counters.snapshot()
    }

    /// Returns the manager-level default TTL, if one is configured.
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Returns the number of configured tiers.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Starts building a derived manager that shares this manager's tiers.
    ///
    /// The derived manager starts with this manager's default TTL, fresh
    /// counters, and no listeners; the builder can override the TTL and
    /// append further tiers.
    #[must_use]
    pub fn extend(&self) -> ExtendBuilder<K, V> {
        ExtendBuilder::new(self.tiers.clone(), self.default_ttl)
    }

    /// Releases the resources of every tier.
    ///
    /// Idempotent: only the first call reaches the tiers. Derived managers
    /// share tier instances, so disconnecting one manager disconnects the
    /// tiers for all of them.
    pub async fn disconnect(&self) {
        if self.disconnected.swap(true, Ordering::SeqCst) {
            return;
        }
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Err(error) = tier.disconnect().await {
                self.note_tier_failure("disconnect", index, &error);
            }
        }
    }

    /// Writes the entry into every tier nearer than `found_at`, preserving
    /// the original timestamp and TTL. Failures are absorbed; the read that
    /// triggered the promotion still succeeds.
    async fn promote(&self, key: &K, entry: &StoreEntry<V>, found_at: usize) {
        let writes = self.tiers[..found_at]
            .iter()
            .enumerate()
            .map(|(index, tier)| {
                let entry = entry.clone();
                async move { (index, tier.set(key, entry).await) }
            });

        for (index, result) in join_all(writes).await {
            if let Err(error) = result {
                self.note_tier_failure("promote", index, &error);
            }
        }
    }

    async fn write(&self, key: &K, value: V, ttl: Option<Duration>) {
        // Presence in the nearest tier decides between added and updated.
        let existed = match self.tiers.first() {
            Some(nearest) => match nearest.get(key).await {
                Ok(Some(entry)) => !entry.is_expired(self.default_ttl),
                Ok(None) => false,
                Err(error) => {
                    self.note_tier_failure("set", 0, &error);
                    false
                }
            },
            None => false,
        };

        let mut entry = StoreEntry::new(value.clone());
        if let Some(ttl) = ttl {
            entry.set_ttl(ttl);
        }
        entry.set_cached_at(Instant::now());

        let writes = self.tiers.iter().enumerate().map(|(index, tier)| {
            let entry = entry.clone();
            async move { (index, tier.set(key, entry).await) }
        });

        let mut first_error = None;
        for (index, result) in join_all(writes).await {
            if let Err(error) = result {
                self.note_tier_failure("set", index, &error);
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }

        if existed {
            self.counters.record_updated();
        } else {
            self.counters.record_added();
        }
        self.emit(CacheEvent::Set {
            key: key.clone(),
            value,
            error: first_error,
        });
    }

    fn note_tier_failure(&self, operation: &'static str, tier: usize, error: &Error) {
        self.counters.record_error();
        tracing::warn!(operation, tier, %error, "store tier operation failed");
    }

    fn emit(&self, event: CacheEvent<K, V>) {
        self.listeners.emit(&event);
    }

    pub(crate) fn emit_refresh(&self, key: &K, error: Option<Error>) {
        self.emit(CacheEvent::Refresh {
            key: key.clone(),
            error,
        });
    }

    pub(crate) fn record_fetch_error(&self) {
        self.counters.record_error();
    }
}
