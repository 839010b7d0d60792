//! Mock store implementation for testing.
//!
//! This module provides [`MockStore`], a configurable in-memory store that
//! records all operations and supports failure injection for testing error paths.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{Error, Store, StoreEntry};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp<K, V> {
    /// A get operation was performed with the given key.
    Get(K),
    /// A set operation was performed with the given key and entry.
    Set {
        /// The key that was written.
        key: K,
        /// The entry that was written.
        entry: StoreEntry<V>,
    },
    /// A delete operation was performed with the given key.
    Delete(K),
    /// A clear operation was performed.
    Clear,
    /// A key enumeration was performed.
    Keys,
    /// A disconnect was performed.
    Disconnect,
}

type FailPredicate<K, V> = Box<dyn Fn(&StoreOp<K, V>) -> bool + Send + Sync>;

/// A configurable mock store for testing.
///
/// This store keeps values in memory and can be configured to fail operations
/// on demand, making it useful for testing error handling paths. All
/// operations are recorded for later verification.
///
/// # Examples
///
/// ```no_run
/// use strata_store::{testing::{MockStore, StoreOp}, Store, StoreEntry};
///
/// # async fn example() {
/// let store = MockStore::<String, i32>::new();
///
/// store.set(&"key".to_string(), StoreEntry::new(42)).await.unwrap();
/// let value = store.get(&"key".to_string()).await.unwrap();
/// assert_eq!(*value.unwrap().value(), 42);
///
/// assert_eq!(store.operations(), vec![
///     StoreOp::Set { key: "key".to_string(), entry: StoreEntry::new(42) },
///     StoreOp::Get("key".to_string()),
/// ]);
/// # }
/// ```
///
/// # Failure Injection
///
/// ```no_run
/// use strata_store::{testing::{MockStore, StoreOp}, Store};
///
/// # async fn example() {
/// let store: MockStore<String, i32> = MockStore::new();
///
/// // Fail all get operations
/// store.fail_when(|op| matches!(op, StoreOp::Get(_)));
/// assert!(store.get(&"key".to_string()).await.is_err());
///
/// // Fail only specific keys
/// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "forbidden"));
/// assert!(store.get(&"forbidden".to_string()).await.is_err());
/// assert!(store.get(&"allowed".to_string()).await.is_ok());
/// # }
/// ```
pub struct MockStore<K, V> {
    data: Arc<Mutex<HashMap<K, StoreEntry<V>>>>,
    operations: Arc<Mutex<Vec<StoreOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, V>>>>,
}

impl<K, V> std::fmt::Debug for MockStore<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<K, V> Clone for MockStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> Default for MockStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockStore<K, V> {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }
}

impl<K, V> MockStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a mock store with pre-populated data.
    #[must_use]
    pub fn with_data(data: HashMap<K, StoreEntry<V>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the store contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.data.lock().contains_key(key)
    }
}

impl<K, V> MockStore<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_store::testing::{MockStore, StoreOp};
    ///
    /// let store: MockStore<String, i32> = MockStore::new();
    ///
    /// // Fail all operations
    /// store.fail_when(|_| true);
    ///
    /// // Fail only gets
    /// store.fail_when(|op| matches!(op, StoreOp::Get(_)));
    ///
    /// // Fail gets for a specific key
    /// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "bad_key"));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp<K, V>> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: StoreOp<K, V>) {
        self.operations.lock().push(op);
    }

    fn should_fail(&self, op: &StoreOp<K, V>) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl<K, V> Store<K, V> for MockStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<StoreEntry<V>>, Error> {
        let op = StoreOp::Get(key.clone());
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::message("mock: get failed"));
        }
        self.record(op);
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &K, entry: StoreEntry<V>) -> Result<(), Error> {
        let op = StoreOp::Set {
            key: key.clone(),
            entry: entry.clone(),
        };
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::message("mock: set failed"));
        }
        self.record(op);
        self.data.lock().insert(key.clone(), entry);
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<bool, Error> {
        let op = StoreOp::Delete(key.clone());
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::message("mock: delete failed"));
        }
        self.record(op);
        Ok(self.data.lock().remove(key).is_some())
    }

    async fn clear(&self) -> Result<(), Error> {
        let op = StoreOp::Clear;
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::message("mock: clear failed"));
        }
        self.record(op);
        self.data.lock().clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<K>, Error> {
        let op = StoreOp::Keys;
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::message("mock: keys failed"));
        }
        self.record(op);
        Ok(self.data.lock().keys().cloned().collect())
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }

    async fn disconnect(&self) -> Result<(), Error> {
        let op = StoreOp::Disconnect;
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::message("mock: disconnect failed"));
        }
        self.record(op);
        Ok(())
    }
}
