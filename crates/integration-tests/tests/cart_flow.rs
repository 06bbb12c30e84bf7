//! Integration tests for optimistic cart mutations.
//!
//! The cart applies every mutation locally first and treats the remote
//! order service as a best-effort mirror. These tests drive a real
//! `CartStore` against the scripted API fake and the in-memory offline
//! store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use potlucky_client::cart::{CART_STORAGE_KEY, CartStore};
use potlucky_client::offline::{MemoryStore, OfflineStore};
use potlucky_core::CartItem;
use potlucky_integration_tests::{FailingStore, FakeApi, init_tracing, meal};

fn cart_store() -> (Arc<FakeApi>, Arc<MemoryStore>, CartStore) {
    let api = Arc::new(FakeApi::new());
    let offline = Arc::new(MemoryStore::new());
    let store = CartStore::new(api.clone(), offline.clone());
    (api, offline, store)
}

// =============================================================================
// Merge and Total Invariants
// =============================================================================

#[tokio::test]
async fn test_repeated_adds_merge_into_one_row() {
    init_tracing();
    let (_api, _offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 2).await;
    store.add_to_cart(&meal("m1", "10.00"), 3).await;

    let state = store.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].quantity, 5);
    assert_eq!(state.total, "50.00".parse().unwrap());
    assert_eq!(store.item_count(), 5);
}

#[tokio::test]
async fn test_total_tracks_every_mutation() {
    init_tracing();
    let (_api, _offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 2).await;
    assert_eq!(store.total(), "20.00".parse().unwrap());

    store.add_to_cart(&meal("m2", "3.50"), 1).await;
    assert_eq!(store.total(), "23.50".parse().unwrap());

    let line = store.snapshot().items[0].line_id.clone();
    store.update_quantity(&line, 1);
    assert_eq!(store.total(), "13.50".parse().unwrap());

    store.remove_from_cart(&line).await;
    assert_eq!(store.total(), "3.50".parse().unwrap());
}

#[tokio::test]
async fn test_update_quantity_to_zero_removes_line() {
    init_tracing();
    let (_api, _offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 3).await;
    let line = store.snapshot().items[0].line_id.clone();

    store.update_quantity(&line, 0);

    let state = store.snapshot();
    assert!(state.items.is_empty());
    assert_eq!(store.item_count(), 0);
    assert_eq!(store.total(), "0".parse().unwrap());
}

// =============================================================================
// Optimistic Failure Policy
// =============================================================================

#[tokio::test]
async fn test_add_survives_remote_failure() {
    init_tracing();
    let api = Arc::new(FakeApi::failing());
    let store = CartStore::new(api.clone(), Arc::new(MemoryStore::new()));

    store.add_to_cart(&meal("m1", "10.00"), 2).await;

    // The optimistic row stands, no error is surfaced
    let state = store.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].quantity, 2);
    assert!(state.error.is_none());
    assert_eq!(api.calls(), vec!["add_to_cart"]);
}

#[tokio::test]
async fn test_remove_and_clear_survive_remote_failure() {
    init_tracing();
    let api = Arc::new(FakeApi::failing());
    let store = CartStore::new(api.clone(), Arc::new(MemoryStore::new()));

    store.add_to_cart(&meal("m1", "10.00"), 1).await;
    store.add_to_cart(&meal("m2", "5.00"), 1).await;

    let line = store.snapshot().items[0].line_id.clone();
    store.remove_from_cart(&line).await;
    assert_eq!(store.snapshot().items.len(), 1);

    store.clear_cart().await;
    assert!(store.snapshot().items.is_empty());
    assert!(store.snapshot().error.is_none());
}

#[tokio::test]
async fn test_update_quantity_issues_no_remote_call() {
    init_tracing();
    let (api, _offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 1).await;
    let line = store.snapshot().items[0].line_id.clone();

    store.update_quantity(&line, 4);
    store.update_quantity(&line, 2);

    // Quantity changes are local-only; only the add reached the server
    assert_eq!(api.calls(), vec!["add_to_cart"]);
}

#[tokio::test]
async fn test_remote_mirror_receives_added_rows() {
    init_tracing();
    let (api, _offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 2).await;

    let local = store.snapshot().items;
    let remote = api.server_cart();
    assert_eq!(remote, local);
}

// =============================================================================
// Persistence Side Effects
// =============================================================================

#[tokio::test]
async fn test_every_mutation_rewrites_snapshot() {
    init_tracing();
    let (_api, offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 2).await;

    let raw = offline.get(CART_STORAGE_KEY).unwrap().unwrap();
    let stored: Vec<CartItem> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, store.snapshot().items);

    // Driving the last line to zero persists an empty array, not a stale one
    let line = store.snapshot().items[0].line_id.clone();
    store.update_quantity(&line, 0);

    let raw = offline.get(CART_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(raw, "[]");
}

#[tokio::test]
async fn test_clear_cart_purges_snapshot() {
    init_tracing();
    let (_api, offline, store) = cart_store();

    store.add_to_cart(&meal("m1", "10.00"), 2).await;
    assert!(offline.get(CART_STORAGE_KEY).unwrap().is_some());

    store.clear_cart().await;

    assert!(store.snapshot().items.is_empty());
    assert!(offline.get(CART_STORAGE_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_mutations_survive_offline_write_failure() {
    init_tracing();
    let store = CartStore::new(Arc::new(FakeApi::new()), Arc::new(FailingStore));

    store.add_to_cart(&meal("m1", "10.00"), 2).await;
    let line = store.snapshot().items[0].line_id.clone();
    store.update_quantity(&line, 5);

    // Unwritable storage never disturbs the in-memory cart
    assert_eq!(store.item_count(), 5);
    assert_eq!(store.total(), "50.00".parse().unwrap());
    assert!(store.snapshot().error.is_none());

    store.clear_cart().await;
    assert!(store.snapshot().items.is_empty());
}
