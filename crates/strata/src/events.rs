//! Typed lifecycle events and listener registration.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use strata_store::Error;

/// The tag of a [`CacheEvent`] variant, used to register listeners for a
/// single event family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A write completed (possibly partially, see the event's `error`).
    Set,
    /// A delete completed.
    Del,
    /// All tiers were cleared.
    Clear,
    /// An upstream fetch refreshed (or failed to refresh) a key.
    Refresh,
    /// A layered read resolved.
    Get,
}

/// A lifecycle event emitted by a cache manager.
///
/// Events carry the affected key and, for operations that can partially fail
/// across tiers, the first error encountered. Listener invocation order is
/// unspecified.
#[derive(Clone, Debug)]
pub enum CacheEvent<K, V> {
    /// A value was written to the tiers.
    Set {
        /// Key that was written.
        key: K,
        /// Value that was written.
        value: V,
        /// First tier failure during the fan-out, if any.
        error: Option<Error>,
    },
    /// A key was deleted from the tiers.
    Del {
        /// Key that was deleted.
        key: K,
        /// First tier failure during the fan-out, if any.
        error: Option<Error>,
    },
    /// All tiers were cleared.
    Clear,
    /// An upstream fetch ran for a key.
    Refresh {
        /// Key that was fetched.
        key: K,
        /// The fetch failure, if the upstream data function failed.
        error: Option<Error>,
    },
    /// A layered read resolved.
    Get {
        /// Key that was read.
        key: K,
        /// Whether any tier held a live entry.
        found: bool,
    },
}

impl<K, V> CacheEvent<K, V> {
    /// Returns the tag identifying this event's variant.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Set { .. } => EventKind::Set,
            Self::Del { .. } => EventKind::Del,
            Self::Clear => EventKind::Clear,
            Self::Refresh { .. } => EventKind::Refresh,
            Self::Get { .. } => EventKind::Get,
        }
    }
}

type Listener<K, V> = Arc<dyn Fn(&CacheEvent<K, V>) + Send + Sync>;

/// Listener lists keyed by event tag. Emission takes a read lock, so
/// listeners may fire concurrently from different tasks; subscription takes
/// the write lock.
pub(crate) struct EventListeners<K, V> {
    lists: RwLock<HashMap<EventKind, Vec<Listener<K, V>>>>,
}

impl<K, V> EventListeners<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn subscribe(
        &self,
        kind: EventKind,
        listener: impl Fn(&CacheEvent<K, V>) + Send + Sync + 'static,
    ) {
        self.lists
            .write()
            .entry(kind)
            .or_default()
            .push(Arc::new(listener));
    }

    pub(crate) fn emit(&self, event: &CacheEvent<K, V>) {
        let lists = self.lists.read();
        if let Some(listeners) = lists.get(&event.kind()) {
            for listener in listeners {
                listener(event);
            }
        }
    }
}

impl<K, V> std::fmt::Debug for EventListeners<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lists = self.lists.read();
        let count: usize = lists.values().map(Vec::len).sum();
        f.debug_struct("EventListeners")
            .field("listener_count", &count)
            .finish()
    }
}
