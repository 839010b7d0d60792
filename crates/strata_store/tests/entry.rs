//! Integration tests for `StoreEntry`.

use std::time::Duration;

use strata_store::StoreEntry;
use tokio::time::Instant;

#[test]
fn new_entry_has_no_metadata() {
    let entry = StoreEntry::new(42);
    assert_eq!(*entry.value(), 42);
    assert!(entry.cached_at().is_none());
    assert!(entry.ttl().is_none());
}

#[test]
fn with_ttl_sets_per_entry_ttl() {
    let entry = StoreEntry::with_ttl("data".to_string(), Duration::from_secs(60));
    assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
}

#[test]
fn deref_and_into_value() {
    let entry = StoreEntry::new("hello".to_string());
    assert_eq!(entry.len(), 5); // through Deref
    assert_eq!(entry.into_value(), "hello");
}

#[test]
fn from_value_conversion() {
    let entry: StoreEntry<i32> = 42.into();
    assert_eq!(*entry.value(), 42);
}

#[test]
fn entry_without_ttl_never_expires() {
    let entry = StoreEntry::new(1);
    assert!(!entry.is_expired(None));
}

#[test]
fn entry_with_ttl_but_no_timestamp_counts_as_expired() {
    let entry = StoreEntry::with_ttl(1, Duration::from_secs(60));
    assert!(entry.is_expired(None));
}

#[tokio::test(start_paused = true)]
async fn entry_expires_after_ttl_elapses() {
    let mut entry = StoreEntry::with_ttl(1, Duration::from_millis(100));
    entry.set_cached_at(Instant::now());

    assert!(!entry.is_expired(None));

    tokio::time::advance(Duration::from_millis(150)).await;
    assert!(entry.is_expired(None));
}

#[tokio::test(start_paused = true)]
async fn per_entry_ttl_takes_precedence_over_default() {
    let mut entry = StoreEntry::with_ttl(1, Duration::from_secs(120));
    entry.set_cached_at(Instant::now());

    tokio::time::advance(Duration::from_secs(90)).await;

    // Default of 60s alone would have expired this entry.
    assert!(!entry.is_expired(Some(Duration::from_secs(60))));
}

#[tokio::test(start_paused = true)]
async fn remaining_ttl_counts_down_and_saturates() {
    let mut entry = StoreEntry::new(1);
    entry.set_cached_at(Instant::now());

    let default = Some(Duration::from_millis(1000));
    assert_eq!(entry.remaining_ttl(default), Some(Duration::from_millis(1000)));

    tokio::time::advance(Duration::from_millis(400)).await;
    assert_eq!(entry.remaining_ttl(default), Some(Duration::from_millis(600)));

    tokio::time::advance(Duration::from_millis(800)).await;
    assert_eq!(entry.remaining_ttl(default), Some(Duration::ZERO));
}

#[test]
fn remaining_ttl_is_none_without_ttl() {
    let mut entry = StoreEntry::new(1);
    entry.set_cached_at(Instant::now());
    assert_eq!(entry.remaining_ttl(None), None);
}
