//! Integration tests for `MemoryStore`.

use std::time::Duration;

use strata_memory::MemoryStore;
use strata_store::{Store, StoreEntry};

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn get_returns_none_for_missing_key() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        assert!(store.get(&"missing".to_string()).await.expect("get failed").is_none());
    });
}

#[test]
fn set_then_get_roundtrip() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        let key = "key".to_string();

        store.set(&key, StoreEntry::new(42)).await.expect("set failed");

        let entry = store.get(&key).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 42);
    });
}

#[test]
fn set_overwrites_existing_value() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        let key = "key".to_string();

        store.set(&key, StoreEntry::new(1)).await.expect("set failed");
        store.set(&key, StoreEntry::new(2)).await.expect("set failed");

        let entry = store.get(&key).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 2);
    });
}

#[test]
fn delete_reports_prior_presence() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        let key = "key".to_string();

        assert!(!store.delete(&key).await.expect("delete failed"));

        store.set(&key, StoreEntry::new(42)).await.expect("set failed");
        assert!(store.delete(&key).await.expect("delete failed"));
        assert!(store.get(&key).await.expect("get failed").is_none());
    });
}

#[test]
fn clear_removes_all_entries() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        store.set(&"a".to_string(), StoreEntry::new(1)).await.expect("set failed");
        store.set(&"b".to_string(), StoreEntry::new(2)).await.expect("set failed");

        store.clear().await.expect("clear failed");

        assert!(store.get(&"a".to_string()).await.expect("get failed").is_none());
        assert!(store.get(&"b".to_string()).await.expect("get failed").is_none());
    });
}

#[test]
fn keys_enumerates_contents() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        store.set(&"a".to_string(), StoreEntry::new(1)).await.expect("set failed");
        store.set(&"b".to_string(), StoreEntry::new(2)).await.expect("set failed");

        let mut keys = store.keys().await.expect("keys failed");
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    });
}

#[test]
fn entry_metadata_survives_the_roundtrip() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        let key = "key".to_string();

        store
            .set(&key, StoreEntry::with_ttl(42, Duration::from_secs(60)))
            .await
            .expect("set failed");

        let entry = store.get(&key).await.expect("get failed").expect("entry should exist");
        assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
    });
}

#[test]
fn clones_share_the_same_storage() {
    block_on(async {
        let store = MemoryStore::<String, i32>::new();
        let clone = store.clone();

        store.set(&"key".to_string(), StoreEntry::new(7)).await.expect("set failed");
        assert!(clone.get(&"key".to_string()).await.expect("get failed").is_some());
    });
}

#[test]
fn builder_configures_capacity_and_name() {
    let store = MemoryStore::<String, i32>::builder()
        .max_capacity(10)
        .initial_capacity(4)
        .time_to_idle(Duration::from_secs(30))
        .name("unit-test-store")
        .build()
        .expect("configuration should be valid");

    // A freshly built store is empty.
    assert_eq!(store.len(), Some(0));
}

#[test]
fn builder_rejects_degenerate_configurations() {
    assert!(MemoryStore::<String, i32>::builder().max_capacity(0).build().is_err());
    assert!(
        MemoryStore::<String, i32>::builder()
            .time_to_live(Duration::ZERO)
            .build()
            .is_err()
    );
}
