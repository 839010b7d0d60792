//! Dynamic store wrapper for type erasure.

use std::{fmt::Debug, sync::Arc};

use futures::future::BoxFuture;

use crate::{Error, Store, StoreEntry};

/// Object-safe mirror of [`Store`] used behind the `Arc` in [`DynamicStore`].
trait ErasedStore<K, V>: Send + Sync {
    fn get<'a>(&'a self, key: &'a K) -> BoxFuture<'a, Result<Option<StoreEntry<V>>, Error>>;
    fn set<'a>(&'a self, key: &'a K, entry: StoreEntry<V>) -> BoxFuture<'a, Result<(), Error>>;
    fn delete<'a>(&'a self, key: &'a K) -> BoxFuture<'a, Result<bool, Error>>;
    fn clear(&self) -> BoxFuture<'_, Result<(), Error>>;
    fn keys(&self) -> BoxFuture<'_, Result<Vec<K>, Error>>;
    fn len(&self) -> Option<u64>;
    fn disconnect(&self) -> BoxFuture<'_, Result<(), Error>>;
}

impl<K, V, T> ErasedStore<K, V> for T
where
    K: Send + 'static,
    V: 'static,
    T: Store<K, V>,
{
    fn get<'a>(&'a self, key: &'a K) -> BoxFuture<'a, Result<Option<StoreEntry<V>>, Error>> {
        Box::pin(Store::get(self, key))
    }

    fn set<'a>(&'a self, key: &'a K, entry: StoreEntry<V>) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(Store::set(self, key, entry))
    }

    fn delete<'a>(&'a self, key: &'a K) -> BoxFuture<'a, Result<bool, Error>> {
        Box::pin(Store::delete(self, key))
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(Store::clear(self))
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<K>, Error>> {
        Box::pin(Store::keys(self))
    }

    fn len(&self) -> Option<u64> {
        Store::len(self)
    }

    fn disconnect(&self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(Store::disconnect(self))
    }
}

/// Extension trait for converting any `Store` into a `DynamicStore`.
///
/// This trait is automatically implemented for all types that implement `Store`.
///
/// # Examples
///
/// ```
/// use strata_store::{DynamicStore, IntoDynamicStore, Store};
///
/// fn erase<T>(store: T) -> DynamicStore<String, i32>
/// where
///     T: Store<String, i32> + 'static,
/// {
///     store.into_dynamic()
/// }
/// ```
pub trait IntoDynamicStore<K, V>: Sized {
    /// Converts this store into a `DynamicStore`.
    fn into_dynamic(self) -> DynamicStore<K, V>;
}

impl<K, V, T> IntoDynamicStore<K, V> for T
where
    K: Send + 'static,
    V: 'static,
    T: Store<K, V> + 'static,
{
    fn into_dynamic(self) -> DynamicStore<K, V> {
        DynamicStore::new(self)
    }
}

/// A clonable dynamic store with type erasure.
///
/// `DynamicStore` wraps a trait object in an `Arc` to enable cloning while
/// maintaining dynamic dispatch. The coordination layer uses this to own an
/// ordered list of heterogeneous tiers, and derived managers share the same
/// tier instances by cloning the list.
pub struct DynamicStore<K, V>(Arc<dyn ErasedStore<K, V> + 'static>);

impl<K, V> DynamicStore<K, V> {
    /// Creates a new dynamic store from any `Store` implementation.
    pub fn new<T>(store: T) -> Self
    where
        K: Send + 'static,
        V: 'static,
        T: Store<K, V> + 'static,
    {
        Self(Arc::new(store))
    }
}

impl<K, V> Debug for DynamicStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStore").finish()
    }
}

impl<K, V> Clone for DynamicStore<K, V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<K, V> Store<K, V> for DynamicStore<K, V>
where
    K: Sync + Send,
    V: Send,
{
    async fn get(&self, key: &K) -> Result<Option<StoreEntry<V>>, Error> {
        self.0.get(key).await
    }

    async fn set(&self, key: &K, entry: StoreEntry<V>) -> Result<(), Error> {
        self.0.set(key, entry).await
    }

    async fn delete(&self, key: &K) -> Result<bool, Error> {
        self.0.delete(key).await
    }

    async fn clear(&self) -> Result<(), Error> {
        self.0.clear().await
    }

    async fn keys(&self) -> Result<Vec<K>, Error> {
        self.0.keys().await
    }

    fn len(&self) -> Option<u64> {
        self.0.len()
    }

    fn is_empty(&self) -> Option<bool> {
        self.0.len().map(|len| len == 0)
    }

    async fn disconnect(&self) -> Result<(), Error> {
        self.0.disconnect().await
    }
}
