//! Core store abstractions for building cache tiers.
//!
//! This crate defines the [`Store`] trait that every cache backend must satisfy,
//! along with [`StoreEntry`] for storing values with expiry metadata and [`Error`]
//! types for fallible operations.
//!
//! # Overview
//!
//! The store abstraction separates storage concerns from coordination features.
//! Implement [`Store`] for your backend, then use `strata` to compose ordered
//! tier lists with hit promotion, fan-out writes, metadata counters, and
//! cache-aside loading on top.
//!
//! # Implementing a Store
//!
//! Implement the four required methods of [`Store`]:
//!
//! ```
//! use strata_store::{Error, Store, StoreEntry};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleStore<K, V>(RwLock<HashMap<K, StoreEntry<V>>>);
//!
//! impl<K, V> Store<K, V> for SimpleStore<K, V>
//! where
//!     K: Clone + Eq + std::hash::Hash + Send + Sync,
//!     V: Clone + Send + Sync,
//! {
//!     async fn get(&self, key: &K) -> Result<Option<StoreEntry<V>>, Error> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &K, entry: StoreEntry<V>) -> Result<(), Error> {
//!         self.0.write().unwrap().insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, key: &K) -> Result<bool, Error> {
//!         Ok(self.0.write().unwrap().remove(key).is_some())
//!     }
//!
//!     async fn clear(&self) -> Result<(), Error> {
//!         self.0.write().unwrap().clear();
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! [`DynamicStore`] wraps any `Store` in a cheaply-cloneable type-erased
//! container. Multi-tier managers use it to hold an ordered list of
//! heterogeneous backends.

mod dynamic;
mod entry;
pub mod error;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use dynamic::{DynamicStore, IntoDynamicStore};
#[doc(inline)]
pub use entry::StoreEntry;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use store::Store;
