//! Durable persistence integration tests over the file backend.
//!
//! Exercises the containers against real slot files in a temporary data
//! directory: rehydration across sessions, slot erasure on clear, and
//! tolerance of corrupt slot contents.

use rust_decimal::Decimal;

use vetrina_core::ProductId;
use vetrina_storefront::api::Product;
use vetrina_storefront::config::StorefrontConfig;
use vetrina_storefront::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn product(id: i64, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Decimal::from(price),
        description: format!("Description {id}"),
        category: "electronics".to_string(),
        image: format!("https://example.com/{id}.jpg"),
        rating: None,
    }
}

fn state_in(dir: &std::path::Path) -> AppState {
    let config = StorefrontConfig {
        data_dir: dir.to_path_buf(),
        ..StorefrontConfig::default()
    };
    AppState::new(config).expect("state must build")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Cart and wishlist state survives an application restart.
#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let mut state = state_in(dir.path());
        state.cart_mut().add_to_cart(product(1, 10), 2);
        state.cart_mut().add_to_cart(product(2, 5), 1);
        state.wishlist_mut().toggle_wishlist(product(3, 7));
    }

    let state = state_in(dir.path());
    assert_eq!(state.cart().total_items(), 3);
    assert_eq!(state.cart().total_price(), Decimal::from(25));
    assert!(state.wishlist().is_in_wishlist(ProductId::new(3)));
}

/// The full cart scenario: totals track mutations, removal leaves an empty
/// persisted list.
#[test]
fn test_cart_scenario_with_durable_slot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut state = state_in(dir.path());

    state.cart_mut().add_to_cart(product(1, 10), 2);
    assert_eq!(state.cart().total_items(), 2);
    assert_eq!(state.cart().total_price(), Decimal::from(20));

    state.cart_mut().increase_quantity(ProductId::new(1));
    assert_eq!(state.cart().total_items(), 3);
    assert_eq!(state.cart().total_price(), Decimal::from(30));

    state.cart_mut().remove_from_cart(ProductId::new(1));
    assert!(state.cart().items().is_empty());

    // The durable slot holds an empty list
    let raw = std::fs::read_to_string(dir.path().join("cart.json")).expect("slot file");
    assert_eq!(raw, "[]");
}

/// Clearing erases the slot files entirely.
#[test]
fn test_clear_erases_slot_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut state = state_in(dir.path());

    state.cart_mut().add_to_cart(product(1, 10), 1);
    state.wishlist_mut().add_to_wishlist(product(2, 5));
    assert!(dir.path().join("cart.json").exists());
    assert!(dir.path().join("wishlist.json").exists());

    state.cart_mut().clear_cart();
    state.wishlist_mut().clear_wishlist();
    assert!(!dir.path().join("cart.json").exists());
    assert!(!dir.path().join("wishlist.json").exists());
}

/// Corrupt slot files rehydrate as empty state instead of failing.
#[test]
fn test_corrupt_slots_rehydrate_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("cart.json"), "{truncated").expect("write");
    std::fs::write(dir.path().join("auth_token.json"), "12345garbage").expect("write");

    let state = state_in(dir.path());
    assert!(state.cart().items().is_empty());
    assert!(!state.auth().is_authenticated());
}
