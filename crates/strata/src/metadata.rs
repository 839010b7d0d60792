//! Operation counters and fetch timing statistics.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use parking_lot::Mutex;

/// Monotonically increasing operation counters shared by a manager and the
/// futures it spawns. Counters are updated with relaxed atomics; reads across
/// counters are not a consistent snapshot of a single instant.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    added: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
    cleared: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_added(&self) {
        self.added.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_updated(&self) {
        self.updated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cleared(&self) {
        self.cleared.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheMetadata {
        CacheMetadata {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            added: self.added.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            cleared: self.cleared.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of a manager's operation counters.
///
/// Hits and misses count layered reads as a whole, not per-tier probes. A
/// `set` increments exactly one of `added` or `updated`. Tier failures that
/// were isolated (logged and skipped) show up under `errors`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheMetadata {
    /// Reads that found a live entry in some tier.
    pub hits: u64,
    /// Reads that exhausted every tier without a live entry.
    pub misses: u64,
    /// Writes for keys that were not previously present.
    pub added: u64,
    /// Writes that replaced an existing live entry.
    pub updated: u64,
    /// Delete operations issued through the manager.
    pub deleted: u64,
    /// Clear operations issued through the manager.
    pub cleared: u64,
    /// Tier or fetch failures absorbed by the manager.
    pub errors: u64,
}

/// Accumulated fetch durations, guarded by a mutex since several fields must
/// move together.
#[derive(Debug, Default)]
pub(crate) struct FetchRecorder {
    inner: Mutex<FetchAccum>,
}

#[derive(Debug, Default)]
struct FetchAccum {
    count: u64,
    last: Duration,
    total: Duration,
    longest: Duration,
    shortest: Option<Duration>,
}

impl FetchRecorder {
    pub(crate) fn record(&self, duration: Duration) {
        let mut accum = self.inner.lock();
        accum.count += 1;
        accum.last = duration;
        accum.total += duration;
        accum.longest = accum.longest.max(duration);
        accum.shortest = Some(accum.shortest.map_or(duration, |s| s.min(duration)));
    }

    pub(crate) fn snapshot(&self) -> FetchStats {
        let accum = self.inner.lock();
        let average = u32::try_from(accum.count)
            .ok()
            .filter(|count| *count > 0)
            .map_or(Duration::ZERO, |count| accum.total / count);
        FetchStats {
            count: accum.count,
            last: accum.last,
            total: accum.total,
            average,
            longest: accum.longest,
            shortest: accum.shortest.unwrap_or(Duration::ZERO),
        }
    }
}

/// Timing statistics for upstream fetches issued by an [`AsyncCacheManager`].
///
/// Only fetches that actually ran contribute; callers collapsed onto an
/// in-flight fetch do not inflate the counts. All fields are zero before the
/// first fetch completes.
///
/// [`AsyncCacheManager`]: crate::AsyncCacheManager
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Number of fetches that completed. A fetch that found no upstream
    /// value still counts; a fetch that failed does not.
    pub count: u64,
    /// Duration of the most recent fetch.
    pub last: Duration,
    /// Sum of all fetch durations.
    pub total: Duration,
    /// Mean fetch duration.
    pub average: Duration,
    /// Longest single fetch observed.
    pub longest: Duration,
    /// Shortest single fetch observed.
    pub shortest: Duration,
}

/// Combined metadata for an [`AsyncCacheManager`]: the underlying manager's
/// counters plus fetch timing statistics.
///
/// [`AsyncCacheManager`]: crate::AsyncCacheManager
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AsyncCacheMetadata {
    /// Operation counters of the wrapped cache manager.
    pub counters: CacheMetadata,
    /// Timing statistics for upstream fetches.
    pub fetch: FetchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let counters = Counters::default();
        assert_eq!(counters.snapshot(), CacheMetadata::default());
    }

    #[test]
    fn counters_accumulate_independently() {
        let counters = Counters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        counters.record_added();
        counters.record_updated();
        counters.record_deleted();
        counters.record_cleared();
        counters.record_error();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.added, 1);
        assert_eq!(snapshot.updated, 1);
        assert_eq!(snapshot.deleted, 1);
        assert_eq!(snapshot.cleared, 1);
        assert_eq!(snapshot.errors, 1);
    }

    #[test]
    fn fetch_recorder_tracks_extremes_and_average() {
        let recorder = FetchRecorder::default();
        recorder.record(Duration::from_millis(10));
        recorder.record(Duration::from_millis(30));

        let stats = recorder.snapshot();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.last, Duration::from_millis(30));
        assert_eq!(stats.total, Duration::from_millis(40));
        assert_eq!(stats.average, Duration::from_millis(20));
        assert_eq!(stats.longest, Duration::from_millis(30));
        assert_eq!(stats.shortest, Duration::from_millis(10));
    }

    #[test]
    fn empty_fetch_stats_are_all_zero() {
        let stats = FetchRecorder::default().snapshot();
        assert_eq!(stats, FetchStats::default());
    }
}
