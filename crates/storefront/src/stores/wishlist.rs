//! Wishlist state container.

use tracing::debug;

use vetrina_core::ProductId;

use crate::api::Product;
use crate::storage::{Storage, keys};

/// Wishlist: a set of products, unique by id, in insertion order.
///
/// Rehydrates from the durable wishlist slot on construction and writes the
/// full list back after every mutation.
pub struct WishlistStore {
    items: Vec<Product>,
    storage: Storage,
}

impl WishlistStore {
    /// Create a wishlist, rehydrating any persisted products.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let items = storage.load(keys::WISHLIST, Vec::new());
        Self { items, storage }
    }

    /// The wishlisted products in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Whether a product is wishlisted.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|product| product.id == product_id)
    }

    /// Add a product. No-op when a product with the same id is already there.
    pub fn add_to_wishlist(&mut self, product: Product) {
        if self.is_in_wishlist(product.id) {
            return;
        }

        debug!(product_id = %product.id, "Adding to wishlist");
        self.items.push(product);
        self.persist();
    }

    /// Remove a product by id. No-op when absent.
    pub fn remove_from_wishlist(&mut self, product_id: ProductId) {
        if let Some(index) = self.items.iter().position(|product| product.id == product_id) {
            debug!(product_id = %product_id, "Removing from wishlist");
            self.items.remove(index);
            self.persist();
        }
    }

    /// Add the product if absent, remove it if present.
    pub fn toggle_wishlist(&mut self, product: Product) {
        if self.is_in_wishlist(product.id) {
            self.remove_from_wishlist(product.id);
        } else {
            self.add_to_wishlist(product);
        }
    }

    /// Empty the wishlist and erase its durable slot.
    pub fn clear_wishlist(&mut self) {
        debug!("Clearing wishlist");
        self.items.clear();
        self.storage.remove(keys::WISHLIST);
    }

    fn persist(&self) {
        self.storage.save(keys::WISHLIST, &self.items);
    }
}
