//! Collapsing of concurrent work onto shared in-flight futures.
//!
//! [`PromiseCache`] caches a single future and hands every caller a clone of
//! it until the settled result outlives its maximum age. [`FlightGroup`] does
//! the same per key, but only for the lifetime of the flight.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, OnceLock},
    time::Duration,
};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use strata_store::Error;
use tokio::time::Instant;

type SharedFlight<T> = Shared<BoxFuture<'static, Result<T, Error>>>;

struct Slot<T> {
    flight: SharedFlight<T>,
    /// Set exactly once, from inside the flight, when the generator settles.
    completed_at: Arc<OnceLock<Instant>>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            flight: self.flight.clone(),
            completed_at: Arc::clone(&self.completed_at),
        }
    }
}

/// A cache for a single future, deduplicating concurrent generation.
///
/// The first caller runs the generator; every caller that arrives while the
/// flight is pending awaits the same shared future. A successful result is
/// served for `max_age` from the moment it settled, after which the next
/// caller regenerates. A failed result is never cached: every caller already
/// collapsed onto the failed flight observes the error, and the next caller
/// starts fresh.
///
/// The check-and-generate step is guarded by an async mutex, so the generator
/// runs at most once per regeneration even under concurrency. The generator
/// itself runs outside the lock.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use strata::PromiseCache;
/// # futures::executor::block_on(async {
///
/// let cache = PromiseCache::new(Duration::from_secs(60));
/// let value = cache.get(|| async { Ok::<_, strata::Error>(42) }).await?;
/// assert_eq!(value, 42);
/// # Ok::<(), strata::Error>(())
/// # });
/// ```
pub struct PromiseCache<T> {
    max_age: Duration,
    slot: tokio::sync::Mutex<Option<Slot<T>>>,
}

impl<T> std::fmt::Debug for PromiseCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromiseCache")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl<T> PromiseCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a cache whose settled values live for `max_age`.
    ///
    /// A `max_age` of zero caches nothing beyond the flight itself: pending
    /// callers still collapse, but every settled result is immediately stale.
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            slot: tokio::sync::Mutex::new(None),
        }
    }

    /// Returns the cached value, collapsing onto the in-flight generation or
    /// starting one via `generator` if the slot is empty or stale.
    pub async fn get<F, Fut>(&self, generator: F) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let flight = {
            let mut slot = self.slot.lock().await;
            match slot.as_ref() {
                Some(current) if self.is_live(current) => current.flight.clone(),
                _ => {
                    let fresh = Self::launch(generator());
                    *slot = Some(fresh.clone());
                    fresh.flight
                }
            }
        };
        flight.await
    }

    /// Drops whatever the slot holds; the next caller regenerates.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    fn launch(fut: impl Future<Output = Result<T, Error>> + Send + 'static) -> Slot<T> {
        let completed_at = Arc::new(OnceLock::new());
        let marker = Arc::clone(&completed_at);
        let flight = async move {
            let result = fut.await;
            let _ = marker.set(Instant::now());
            result
        }
        .boxed()
        .shared();
        Slot {
            flight,
            completed_at,
        }
    }

    fn is_live(&self, slot: &Slot<T>) -> bool {
        match slot.flight.peek() {
            // Still pending, collapse onto it.
            None => true,
            Some(Ok(_)) => slot
                .completed_at
                .get()
                .is_some_and(|settled| settled.elapsed() < self.max_age),
            Some(Err(_)) => false,
        }
    }
}

/// Keyed request collapsing: at most one flight per key at a time.
///
/// Unlike [`PromiseCache`], a settled flight is not retained; the leader
/// removes its key from the map as it completes, so the next caller for that
/// key starts a new flight. Callers that already hold a clone of the shared
/// future are unaffected by the removal.
pub(crate) struct FlightGroup<K, T> {
    flights: Arc<parking_lot::Mutex<HashMap<K, SharedFlight<T>>>>,
}

impl<K, T> std::fmt::Debug for FlightGroup<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightGroup")
            .field("in_flight", &self.flights.lock().len())
            .finish()
    }
}

impl<K, T> FlightGroup<K, T>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            flights: Arc::new(parking_lot::Mutex::new(HashMap::new())),
        }
    }

    /// Returns the in-flight future for `key`, creating it with `make` if no
    /// flight exists. The returned future must be awaited by the caller.
    pub(crate) fn run<F, Fut>(&self, key: &K, make: F) -> SharedFlight<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let mut flights = self.flights.lock();
        if let Some(existing) = flights.get(key) {
            return existing.clone();
        }

        let map = Arc::clone(&self.flights);
        let owned_key = key.clone();
        let fut = make();
        let flight = async move {
            let result = fut.await;
            map.lock().remove(&owned_key);
            result
        }
        .boxed()
        .shared();

        flights.insert(key.clone(), flight.clone());
        flight
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn flight_group_collapses_concurrent_callers() {
        let group: FlightGroup<String, i32> = FlightGroup::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = "k".to_string();

        let make = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok(7)
            }
        };

        let a = group.run(&key, make(Arc::clone(&calls)));
        let b = group.run(&key, make(Arc::clone(&calls)));
        let c = group.run(&key, make(Arc::clone(&calls)));

        let (a, b, c) = tokio::join!(a, b, c);
        assert_eq!(a.unwrap(), 7);
        assert_eq!(b.unwrap(), 7);
        assert_eq!(c.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn flight_group_starts_fresh_after_completion() {
        let group: FlightGroup<String, i32> = FlightGroup::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = "k".to_string();

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let flight = group.run(&key, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            });
            flight.await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn flight_group_keys_do_not_interfere() {
        let group: FlightGroup<String, i32> = FlightGroup::new();

        let a = group.run(&"a".to_string(), || async { Ok(1) });
        let b = group.run(&"b".to_string(), || async { Ok(2) });

        assert_eq!(a.await.unwrap(), 1);
        assert_eq!(b.await.unwrap(), 2);
    }
}
