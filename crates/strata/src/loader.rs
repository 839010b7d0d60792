//! Read-through loading on top of a cache manager.

use std::{sync::Arc, time::Duration};

use futures::{FutureExt, future::BoxFuture};
use strata_store::Error;
use tokio::time::Instant;

use crate::{
    events::{CacheEvent, EventKind},
    manager::CacheManager,
    metadata::{AsyncCacheMetadata, FetchRecorder},
    promise::FlightGroup,
};

/// The upstream data function: maps a key to an optional value.
///
/// `Ok(None)` means the upstream has no value for the key; it is returned to
/// the caller as-is and never cached.
pub type DataFn<K, V> =
    Arc<dyn Fn(K) -> BoxFuture<'static, Result<Option<V>, Error>> + Send + Sync>;

/// Hooks observing the lifecycle of upstream fetches.
///
/// Callbacks fire once per fetch that actually runs; callers collapsed onto
/// an in-flight fetch trigger nothing. `on_end` fires after both successful
/// and empty fetches, not after failures.
pub struct LoadCallbacks<K, V> {
    on_start: Option<Box<dyn Fn(&K) + Send + Sync>>,
    on_success: Option<Box<dyn Fn(&K, &V) + Send + Sync>>,
    on_error: Option<Box<dyn Fn(&K, &Error) + Send + Sync>>,
    on_end: Option<Box<dyn Fn(&K, Duration) + Send + Sync>>,
}

impl<K, V> Default for LoadCallbacks<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for LoadCallbacks<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl<K, V> LoadCallbacks<K, V> {
    /// Creates an empty callback set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_start: None,
            on_success: None,
            on_error: None,
            on_end: None,
        }
    }

    /// Called just before the data function runs.
    #[must_use]
    pub fn on_start(mut self, callback: impl Fn(&K) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Called when the data function produced a value.
    #[must_use]
    pub fn on_success(mut self, callback: impl Fn(&K, &V) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Called when the data function failed.
    #[must_use]
    pub fn on_error(mut self, callback: impl Fn(&K, &Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Called after a fetch completed without failing, with its duration.
    #[must_use]
    pub fn on_end(mut self, callback: impl Fn(&K, Duration) + Send + Sync + 'static) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }
}

struct AsyncInner<K, V> {
    manager: CacheManager<K, V>,
    data_fn: DataFn<K, V>,
    fetch: FetchRecorder,
    callbacks: LoadCallbacks<K, V>,
    /// Present when fetch deduplication is enabled.
    flights: Option<FlightGroup<K, Option<V>>>,
}

impl<K, V> AsyncInner<K, V>
where
    K: Clone + Eq + std::hash::Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn fetch_and_store(&self, key: K) -> Result<Option<V>, Error> {
        if let Some(callback) = &self.callbacks.on_start {
            callback(&key);
        }

        let started = Instant::now();
        match (self.data_fn)(key.clone()).await {
            Ok(Some(value)) => {
                let duration = started.elapsed();
                self.manager.set(&key, value.clone()).await;
                self.fetch.record(duration);
                if let Some(callback) = &self.callbacks.on_success {
                    callback(&key, &value);
                }
                if let Some(callback) = &self.callbacks.on_end {
                    callback(&key, duration);
                }
                self.manager.emit_refresh(&key, None);
                Ok(Some(value))
            }
            Ok(None) => {
                // An absent upstream value is not an error and is not cached.
                let duration = started.elapsed();
                self.fetch.record(duration);
                if let Some(callback) = &self.callbacks.on_end {
                    callback(&key, duration);
                }
                Ok(None)
            }
            Err(error) => {
                self.manager.record_fetch_error();
                if let Some(callback) = &self.callbacks.on_error {
                    callback(&key, &error);
                }
                self.manager.emit_refresh(&key, Some(error.clone()));
                Err(error)
            }
        }
    }
}

/// A cache manager paired with an upstream data function.
///
/// Reads first consult the manager's tiers; on a miss the data function
/// fetches the value, the result is cached, and a `Refresh` event fires.
/// With deduplication enabled (the default), concurrent misses for the same
/// key collapse onto a single fetch, and its outcome, including a failure,
/// is shared with every collapsed caller.
///
/// Cloning yields a handle to the same underlying cache and statistics.
///
/// # Examples
///
/// ```
/// use strata::{AsyncCacheManager, CacheManager, Error};
/// # futures::executor::block_on(async {
///
/// let manager: CacheManager<u64, String> = CacheManager::builder().memory().build()?;
/// let users = AsyncCacheManager::builder(manager, |id: u64| async move {
///     Ok::<_, Error>(Some(format!("user-{id}")))
/// })
/// .build();
///
/// assert_eq!(users.get(&7).await?, Some("user-7".to_string()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
pub struct AsyncCacheManager<K, V> {
    inner: Arc<AsyncInner<K, V>>,
}

impl<K, V> Clone for AsyncCacheManager<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> std::fmt::Debug for AsyncCacheManager<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCacheManager")
            .field("manager", &self.inner.manager)
            .field("dedup", &self.inner.flights.is_some())
            .finish_non_exhaustive()
    }
}

impl<K, V> AsyncCacheManager<K, V>
where
    K: Clone + Eq + std::hash::Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a builder wrapping `manager` with the given data function.
    pub fn builder<F, Fut>(
        manager: CacheManager<K, V>,
        data_fn: F,
    ) -> AsyncCacheManagerBuilder<K, V>
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<V>, Error>> + Send + 'static,
    {
        AsyncCacheManagerBuilder {
            manager,
            data_fn: Arc::new(move |key| data_fn(key).boxed()),
            callbacks: LoadCallbacks::new(),
            dedup: true,
        }
    }

    /// Reads a value, fetching it from upstream on a cache miss.
    ///
    /// # Errors
    ///
    /// Propagates the data function's failure. Tier failures never surface
    /// here; they are absorbed by the underlying manager.
    pub async fn get(&self, key: &K) -> Result<Option<V>, Error> {
        if let Some(value) = self.inner.manager.get(key).await {
            return Ok(Some(value));
        }

        match &self.inner.flights {
            Some(flights) => {
                let inner = Arc::clone(&self.inner);
                let fetch_key = key.clone();
                flights
                    .run(key, move || async move {
                        inner.fetch_and_store(fetch_key).await
                    })
                    .await
            }
            None => self.inner.fetch_and_store(key.clone()).await,
        }
    }

    /// Writes a value directly, bypassing the data function.
    pub async fn set(&self, key: &K, value: V) {
        self.inner.manager.set(key, value).await;
    }

    /// Deletes a key from every tier. Returns `true` if any tier held it.
    pub async fn del(&self, key: &K) -> bool {
        self.inner.manager.del(key).await
    }

    /// Clears every tier.
    pub async fn clear(&self) {
        self.inner.manager.clear().await;
    }

    /// Returns `true` if any tier holds a live entry for `key`. Never
    /// triggers a fetch.
    pub async fn contains(&self, key: &K) -> bool {
        self.inner.manager.contains(key).await
    }

    /// Registers a listener on the underlying manager.
    pub fn subscribe(
        &self,
        kind: EventKind,
        listener: impl Fn(&CacheEvent<K, V>) + Send + Sync + 'static,
    ) {
        self.inner.manager.subscribe(kind, listener);
    }

    /// Returns the manager's counters together with fetch timing statistics.
    #[must_use]
    pub fn metadata(&self) -> AsyncCacheMetadata {
        AsyncCacheMetadata {
            counters: self.inner.manager.metadata(),
            fetch: self.inner.fetch.snapshot(),
        }
    }

    /// Returns the underlying cache manager.
    #[must_use]
    pub fn manager(&self) -> &CacheManager<K, V> {
        &self.inner.manager
    }
}

/// Builder for an [`AsyncCacheManager`].
pub struct AsyncCacheManagerBuilder<K, V> {
    manager: CacheManager<K, V>,
    data_fn: DataFn<K, V>,
    callbacks: LoadCallbacks<K, V>,
    dedup: bool,
}

impl<K, V> std::fmt::Debug for AsyncCacheManagerBuilder<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCacheManagerBuilder")
            .field("manager", &self.manager)
            .field("callbacks", &self.callbacks)
            .field("dedup", &self.dedup)
            .finish_non_exhaustive()
    }
}

impl<K, V> AsyncCacheManagerBuilder<K, V> {
    /// Installs lifecycle callbacks for upstream fetches.
    #[must_use]
    pub fn callbacks(mut self, callbacks: LoadCallbacks<K, V>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Disables fetch deduplication: every concurrent miss runs its own
    /// fetch.
    #[must_use]
    pub fn without_dedup(mut self) -> Self {
        self.dedup = false;
        self
    }

    /// Builds the async manager.
    #[must_use]
    pub fn build(self) -> AsyncCacheManager<K, V>
    where
        K: Clone + Eq + std::hash::Hash + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        AsyncCacheManager {
            inner: Arc::new(AsyncInner {
                manager: self.manager,
                data_fn: self.data_fn,
                fetch: FetchRecorder::default(),
                callbacks: self.callbacks,
                flights: self.dedup.then(FlightGroup::new),
            }),
        }
    }
}
