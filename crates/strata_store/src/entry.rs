use std::{ops::Deref, time::Duration};

use tokio::time::Instant;

/// A cached value with expiry metadata.
///
/// `StoreEntry` wraps a value with an optional timestamp and per-entry TTL.
/// The coordination layer uses this metadata to decide whether an entry found
/// in a tier still counts as a hit.
///
/// Timestamps use [`tokio::time::Instant`] so that TTL behavior can be tested
/// deterministically under a paused runtime.
///
/// # Examples
///
/// ```
/// use strata_store::StoreEntry;
/// use std::time::Duration;
///
/// // Simple entry with just a value
/// let entry = StoreEntry::new(42);
/// assert_eq!(*entry.value(), 42);
///
/// // Entry with per-entry TTL
/// let entry = StoreEntry::with_ttl("data".to_string(), Duration::from_secs(60));
/// assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreEntry<V> {
    value: V,
    cached_at: Option<Instant>,
    /// Per-entry TTL override. If set, takes precedence over the manager default.
    ttl: Option<Duration>,
}

impl<V> StoreEntry<V> {
    /// Creates a new entry with the given value.
    ///
    /// The timestamp is set by the manager when the entry is written.
    pub fn new(value: V) -> Self {
        Self {
            value,
            cached_at: None,
            ttl: None,
        }
    }

    /// Creates a new entry with a per-entry TTL.
    ///
    /// The per-entry TTL takes precedence over the manager-level default TTL.
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: None,
            ttl: Some(ttl),
        }
    }

    /// Creates a new entry with an explicit timestamp.
    ///
    /// This is typically used when recreating entries from persistent storage.
    pub fn with_cached_at(value: V, cached_at: Instant) -> Self {
        Self {
            value,
            cached_at: Some(cached_at),
            ttl: None,
        }
    }

    /// Returns the timestamp when this entry was written.
    ///
    /// Returns `None` if the entry has not been written yet.
    #[must_use]
    pub fn cached_at(&self) -> Option<Instant> {
        self.cached_at
    }

    /// Sets the timestamp when this entry was written.
    ///
    /// Called by the manager on write; existing timestamps are preserved when
    /// an entry is promoted between tiers.
    pub fn set_cached_at(&mut self, cached_at: Instant) {
        self.cached_at = Some(cached_at);
    }

    /// Returns the per-entry TTL, if set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sets the per-entry TTL.
    ///
    /// This overrides any manager-level default TTL for this specific entry.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = Some(ttl);
    }

    /// Returns `true` if this entry has outlived its TTL.
    ///
    /// The per-entry TTL takes precedence over `default_ttl`. An entry that
    /// carries a TTL but no timestamp counts as expired. Entries without any
    /// TTL never expire.
    #[must_use]
    pub fn is_expired(&self, default_ttl: Option<Duration>) -> bool {
        match self.ttl.or(default_ttl) {
            Some(ttl) => match self.cached_at {
                Some(cached_at) => cached_at.elapsed() > ttl,
                // A TTL without a timestamp means the write path was bypassed.
                None => true,
            },
            None => false,
        }
    }

    /// Returns the time left before this entry expires.
    ///
    /// Returns `None` if the entry carries no TTL (it never expires) or has
    /// no timestamp; returns `Some(Duration::ZERO)` once expired.
    #[must_use]
    pub fn remaining_ttl(&self, default_ttl: Option<Duration>) -> Option<Duration> {
        let ttl = self.ttl.or(default_ttl)?;
        let cached_at = self.cached_at?;
        Some(ttl.saturating_sub(cached_at.elapsed()))
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V> Deref for StoreEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> From<V> for StoreEntry<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}
