//! Integration tests for cart hydration and offline fallback.
//!
//! `load()` prefers the order service but must always produce a usable
//! cart: a failed fetch falls back to the offline snapshot, a corrupt or
//! missing snapshot falls back to empty.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use potlucky_client::cart::{CART_STORAGE_KEY, CartStore};
use potlucky_client::offline::{MemoryStore, OfflineStore};
use potlucky_core::CartItem;
use potlucky_integration_tests::{FailingStore, FakeApi, init_tracing, meal};

fn seeded_items() -> Vec<CartItem> {
    vec![
        CartItem::from_meal(&meal("m1", "10.00"), 2),
        CartItem::from_meal(&meal("m2", "4.25"), 1),
    ]
}

#[tokio::test]
async fn test_load_replaces_state_with_server_cart() {
    init_tracing();
    let items = seeded_items();
    let api = Arc::new(FakeApi::new().with_cart(items.clone()));
    let store = CartStore::new(api.clone(), Arc::new(MemoryStore::new()));

    store.load().await;

    let state = store.snapshot();
    assert_eq!(state.items, items);
    assert_eq!(state.total, "24.25".parse().unwrap());
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(api.calls(), vec!["get_cart"]);
}

#[tokio::test]
async fn test_load_failure_falls_back_to_snapshot() {
    init_tracing();
    let items = seeded_items();
    let offline = Arc::new(MemoryStore::new());
    offline
        .put(CART_STORAGE_KEY, &serde_json::to_string(&items).unwrap())
        .unwrap();

    let store = CartStore::new(Arc::new(FakeApi::failing()), offline);
    store.load().await;

    // The snapshot becomes the working set; the error is informational
    let state = store.snapshot();
    assert_eq!(state.items, items);
    assert_eq!(state.total, "24.25".parse().unwrap());
    assert!(!state.loading);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_load_failure_without_snapshot_yields_empty_cart() {
    init_tracing();
    let store = CartStore::new(Arc::new(FakeApi::failing()), Arc::new(MemoryStore::new()));

    store.load().await;

    let state = store.snapshot();
    assert!(state.items.is_empty());
    assert_eq!(state.total, "0".parse().unwrap());
    assert!(!state.loading);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_load_discards_corrupt_snapshot() {
    init_tracing();
    let offline = Arc::new(MemoryStore::new());
    offline.put(CART_STORAGE_KEY, "definitely not json").unwrap();

    let store = CartStore::new(Arc::new(FakeApi::failing()), offline);
    store.load().await;

    let state = store.snapshot();
    assert!(state.items.is_empty());
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_load_survives_unreadable_store() {
    init_tracing();
    let store = CartStore::new(Arc::new(FakeApi::failing()), Arc::new(FailingStore));

    store.load().await;

    // Both the remote and the fallback failed; still a usable empty cart
    let state = store.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_reload_after_recovery_clears_error() {
    init_tracing();
    let api = Arc::new(FakeApi::failing());
    let store = CartStore::new(api.clone(), Arc::new(MemoryStore::new()));

    store.load().await;
    assert!(store.snapshot().error.is_some());

    api.set_failing(false);
    store.load().await;

    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn test_load_does_not_write_snapshot() {
    init_tracing();
    let offline = Arc::new(MemoryStore::new());
    let api = Arc::new(FakeApi::new().with_cart(seeded_items()));
    let store = CartStore::new(api, offline.clone());

    store.load().await;

    // Only mutations persist; hydration is read-only towards the store
    assert!(offline.get(CART_STORAGE_KEY).unwrap().is_none());
}
