//! Integration tests for the `Store` trait surface and `DynamicStore`.

use strata_store::testing::{MockStore, StoreOp};
use strata_store::{DynamicStore, IntoDynamicStore, Store, StoreEntry};

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn get_set_delete_roundtrip() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        let key = "key".to_string();

        assert!(store.get(&key).await.expect("get failed").is_none());

        store.set(&key, StoreEntry::new(42)).await.expect("set failed");
        let entry = store.get(&key).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 42);

        assert!(store.delete(&key).await.expect("delete failed"));
        assert!(!store.delete(&key).await.expect("delete failed"));
        assert!(store.get(&key).await.expect("get failed").is_none());
    });
}

#[test]
fn set_overwrites_unconditionally() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        let key = "key".to_string();

        store.set(&key, StoreEntry::new(1)).await.expect("set failed");
        store.set(&key, StoreEntry::new(2)).await.expect("set failed");

        let entry = store.get(&key).await.expect("get failed").expect("entry should exist");
        assert_eq!(*entry.value(), 2);
    });
}

#[test]
fn clear_empties_the_store() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        store.set(&"a".to_string(), StoreEntry::new(1)).await.expect("set failed");
        store.set(&"b".to_string(), StoreEntry::new(2)).await.expect("set failed");
        assert_eq!(store.len(), Some(2));

        store.clear().await.expect("clear failed");
        assert_eq!(store.len(), Some(0));
        assert_eq!(store.is_empty(), Some(true));
    });
}

#[test]
fn operations_are_recorded_in_order() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        let key = "key".to_string();

        store.set(&key, StoreEntry::new(42)).await.expect("set failed");
        let _ = store.get(&key).await.expect("get failed");
        let _ = store.delete(&key).await.expect("delete failed");

        assert_eq!(
            store.operations(),
            vec![
                StoreOp::Set {
                    key: key.clone(),
                    entry: StoreEntry::new(42),
                },
                StoreOp::Get(key.clone()),
                StoreOp::Delete(key),
            ]
        );
    });
}

#[test]
fn failure_injection_targets_matching_operations() {
    block_on(async {
        let store: MockStore<String, i32> = MockStore::new();
        store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "forbidden"));

        assert!(store.get(&"forbidden".to_string()).await.is_err());
        assert!(store.get(&"allowed".to_string()).await.is_ok());

        store.clear_failures();
        assert!(store.get(&"forbidden".to_string()).await.is_ok());
    });
}

#[test]
fn dynamic_store_preserves_functionality() {
    block_on(async {
        let mock = MockStore::<String, i32>::new();
        let check = mock.clone();
        let dynamic: DynamicStore<String, i32> = mock.into_dynamic();

        dynamic.set(&"key".to_string(), StoreEntry::new(7)).await.expect("set failed");
        let entry = dynamic
            .get(&"key".to_string())
            .await
            .expect("get failed")
            .expect("entry should exist");
        assert_eq!(*entry.value(), 7);

        // The erased wrapper talks to the same underlying storage.
        assert!(check.contains_key(&"key".to_string()));
        assert_eq!(dynamic.len(), Some(1));

        assert!(dynamic.delete(&"key".to_string()).await.expect("delete failed"));
        assert_eq!(dynamic.is_empty(), Some(true));
    });
}

#[test]
fn dynamic_store_clones_share_storage() {
    block_on(async {
        let dynamic: DynamicStore<String, i32> = MockStore::new().into_dynamic();
        let clone = dynamic.clone();

        dynamic.set(&"key".to_string(), StoreEntry::new(1)).await.expect("set failed");
        assert!(clone.get(&"key".to_string()).await.expect("get failed").is_some());
    });
}

#[test]
fn keys_enumerates_current_contents() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        store.set(&"a".to_string(), StoreEntry::new(1)).await.expect("set failed");
        store.set(&"b".to_string(), StoreEntry::new(2)).await.expect("set failed");

        let mut keys = store.keys().await.expect("keys failed");
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    });
}

#[test]
fn disconnect_is_recorded_and_repeatable() {
    block_on(async {
        let store = MockStore::<String, i32>::new();
        store.disconnect().await.expect("disconnect failed");
        store.disconnect().await.expect("disconnect failed");
        assert_eq!(store.operations(), vec![StoreOp::Disconnect, StoreOp::Disconnect]);
    });
}
