//! In-memory state containers backed by durable storage.
//!
//! Each container exclusively owns its state, rehydrates it from a named
//! slot on construction, and persists it synchronously after every mutation.
//! Derived values (`total_items`, `is_authenticated`, ...) are recomputed on
//! access, never cached fields that could desynchronize.

pub mod auth;
pub mod cart;
pub mod wishlist;

pub use auth::AuthStore;
pub use cart::{CartItem, CartStore};
pub use wishlist::WishlistStore;
