//! Integration tests for cart and wishlist persistence through file storage.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront::AppState;
use storefront::config::FallbackSource;
use storefront::storage::{FileStorage, Storage};
use storefront::store::{CART_STORAGE_KEY, WISHLIST_STORAGE_KEY};
use storefront_core::ProductId;
use storefront_integration_tests::{product, storefront_config};

fn state_in(dir: &std::path::Path) -> AppState {
    let config = storefront_config("http://127.0.0.1:9", FallbackSource::Bundled);
    AppState::new(config, Arc::new(FileStorage::new(dir))).unwrap()
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut state = state_in(dir.path());
        state.cart_mut().add_item(product(1, "Backpack", 10995), 1);
        state.cart_mut().add_item(product(2, "T-Shirt", 2230), 2);
        state.cart_mut().add_item(product(1, "Backpack", 10995), 1);
    }

    let state = state_in(dir.path());
    let ids: Vec<(i64, u32)> = state
        .cart()
        .lines()
        .iter()
        .map(|line| (line.product.id.as_i64(), line.quantity))
        .collect();
    assert_eq!(ids, vec![(1, 2), (2, 2)]);
    assert_eq!(state.cart().item_count(), 4);
    assert_eq!(state.cart().total(), Decimal::new(26450, 2));
    assert_eq!(state.cart().display_total(), "$264.50");
}

#[test]
fn test_wishlist_and_move_to_cart_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut state = state_in(dir.path());
        state.wishlist_mut().add_item(product(5, "Ring", 16800));
        state.wishlist_mut().add_item(product(6, "Earrings", 999));
        assert!(state.move_to_cart(ProductId::new(5)));
    }

    let state = state_in(dir.path());
    assert!(!state.wishlist().is_in_wishlist(ProductId::new(5)));
    assert!(state.wishlist().is_in_wishlist(ProductId::new(6)));
    assert_eq!(state.cart().line(ProductId::new(5)).unwrap().quantity, 1);
}

#[test]
fn test_snapshot_files_use_fixed_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_in(dir.path());

    state.cart_mut().add_item(product(1, "Backpack", 10995), 1);
    state.wishlist_mut().add_item(product(2, "T-Shirt", 2230));

    assert!(dir.path().join(format!("{CART_STORAGE_KEY}.json")).exists());
    assert!(dir.path().join(format!("{WISHLIST_STORAGE_KEY}.json")).exists());

    let raw = FileStorage::new(dir.path())
        .load(CART_STORAGE_KEY)
        .unwrap()
        .unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["items"][0]["quantity"], 1);
    assert_eq!(snapshot["items"][0]["product"]["price"], 109.95);
}

#[test]
fn test_corrupt_snapshot_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart-storage.json"), "{ not json").unwrap();

    let mut state = state_in(dir.path());
    assert!(state.cart().is_empty());

    state.cart_mut().add_item(product(1, "Backpack", 10995), 3);
    let state = state_in(dir.path());
    assert_eq!(state.cart().item_count(), 3);
}

#[test]
fn test_clear_is_persisted() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut state = state_in(dir.path());
        state.cart_mut().add_item(product(1, "Backpack", 10995), 1);
        state.wishlist_mut().add_item(product(2, "T-Shirt", 2230));
        state.cart_mut().clear();
        state.wishlist_mut().clear();
    }

    let state = state_in(dir.path());
    assert!(state.cart().is_empty());
    assert!(state.wishlist().is_empty());
}
