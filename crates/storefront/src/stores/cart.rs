//! Shopping cart state container.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vetrina_core::ProductId;

use crate::api::Product;
use crate::storage::{Storage, keys};

/// A cart line: a product and how many of it.
///
/// Quantity is always at least 1; a line whose quantity would drop to 0 is
/// removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// Shopping cart: an ordered list of lines, at most one per product id.
///
/// Rehydrates from the durable cart slot on construction and writes the full
/// line list back after every mutation.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Storage,
}

impl CartStore {
    /// Create a cart, rehydrating any persisted lines.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        let items = storage.load(keys::CART, Vec::new());
        Self { items, storage }
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Total price across all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |total, item| {
            total + item.product.price * Decimal::from(item.quantity)
        })
    }

    /// Quantity of a product in the cart, 0 when absent.
    #[must_use]
    pub fn get_item_quantity(&self, product_id: ProductId) -> u32 {
        self.find(product_id).map_or(0, |item| item.quantity)
    }

    /// Whether the cart has a line for this product.
    #[must_use]
    pub fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_some()
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into the existing line when the product is already in the cart,
    /// otherwise appends a new line. Adding zero units is a no-op. No upper
    /// bound is enforced; this is a client-only cart with no stock check.
    pub fn add_to_cart(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        debug!(product_id = %product.id, quantity, "Adding to cart");
        if let Some(item) = self.find_mut(product.id) {
            item.quantity += quantity;
        } else {
            self.items.push(CartItem { product, quantity });
        }
        self.persist();
    }

    /// Remove a product's line entirely. No-op when absent.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        if let Some(index) = self.items.iter().position(|item| item.product.id == product_id) {
            debug!(product_id = %product_id, "Removing from cart");
            self.items.remove(index);
            self.persist();
        }
    }

    /// Set a line's quantity to exactly `quantity` (not additive).
    ///
    /// A quantity of zero or less removes the line. No-op when the product is
    /// not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i32) {
        match u32::try_from(quantity) {
            Ok(quantity) if quantity > 0 => {
                if let Some(item) = self.find_mut(product_id) {
                    item.quantity = quantity;
                    self.persist();
                }
            }
            _ => self.remove_from_cart(product_id),
        }
    }

    /// Add one unit to an existing line. No-op when absent.
    pub fn increase_quantity(&mut self, product_id: ProductId) {
        if let Some(item) = self.find_mut(product_id) {
            item.quantity += 1;
            self.persist();
        }
    }

    /// Remove one unit from an existing line; removes the line when its
    /// quantity is 1. No-op when absent.
    pub fn decrease_quantity(&mut self, product_id: ProductId) {
        match self.find_mut(product_id) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                self.persist();
            }
            Some(_) => self.remove_from_cart(product_id),
            None => {}
        }
    }

    /// Empty the cart and erase its durable slot.
    pub fn clear_cart(&mut self) {
        debug!("Clearing cart");
        self.items.clear();
        self.storage.remove(keys::CART);
    }

    fn find(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    fn find_mut(&mut self, product_id: ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.product.id == product_id)
    }

    // Persistence runs synchronously after every in-memory mutation commits,
    // so the durable slot always reflects the latest state.
    fn persist(&self) {
        self.storage.save(keys::CART, &self.items);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Decimal::from(price),
            description: String::new(),
            category: "electronics".to_string(),
            image: String::new(),
            rating: None,
        }
    }

    fn cart() -> CartStore {
        CartStore::new(Storage::in_memory())
    }

    #[test]
    fn test_add_distinct_products_sums_totals() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 2);
        cart.add_to_cart(product(2, 5), 3);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Decimal::from(35));
    }

    #[test]
    fn test_add_same_product_merges_quantities() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 2);
        cart.add_to_cart(product(1, 10), 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get_item_quantity(ProductId::new(1)), 5);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 0);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 1);
        cart.remove_from_cart(ProductId::new(99));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 2);
        cart.update_quantity(ProductId::new(1), 7);
        assert_eq!(cart.get_item_quantity(ProductId::new(1)), 7);
    }

    #[test]
    fn test_update_quantity_zero_removes_item() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 2);
        cart.update_quantity(ProductId::new(1), 0);
        assert!(!cart.is_in_cart(ProductId::new(1)));
    }

    #[test]
    fn test_update_quantity_negative_removes_item() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 2);
        cart.update_quantity(ProductId::new(1), -5);
        assert!(!cart.is_in_cart(ProductId::new(1)));
    }

    #[test]
    fn test_update_quantity_absent_product_is_noop() {
        let mut cart = cart();
        cart.update_quantity(ProductId::new(1), 3);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_decrease_from_one_removes_item() {
        let mut cart = cart();
        cart.add_to_cart(product(1, 10), 1);
        cart.decrease_quantity(ProductId::new(1));
        assert!(!cart.is_in_cart(ProductId::new(1)));
        assert_eq!(cart.get_item_quantity(ProductId::new(1)), 0);
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = cart();
        assert_eq!(cart.total_items(), 0);

        cart.add_to_cart(product(1, 10), 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Decimal::from(20));

        cart.increase_quantity(ProductId::new(1));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::from(30));

        cart.remove_from_cart(ProductId::new(1));
        assert!(cart.items().is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_mutations_persist_and_rehydrate() {
        let storage = Storage::in_memory();

        let mut cart = CartStore::new(storage.clone());
        cart.add_to_cart(product(1, 10), 2);
        cart.add_to_cart(product(2, 4), 1);

        let rehydrated = CartStore::new(storage);
        assert_eq!(rehydrated.items(), cart.items());
        assert_eq!(rehydrated.total_items(), 3);
    }

    #[test]
    fn test_remove_persists_empty_list() {
        let storage = Storage::in_memory();

        let mut cart = CartStore::new(storage.clone());
        cart.add_to_cart(product(1, 10), 2);
        cart.remove_from_cart(ProductId::new(1));

        // The slot holds an empty list, not the removed line
        let slot: Vec<CartItem> = storage.load(keys::CART, vec![CartItem {
            product: product(9, 9),
            quantity: 1,
        }]);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_clear_cart_erases_slot() {
        let storage = Storage::in_memory();

        let mut cart = CartStore::new(storage.clone());
        cart.add_to_cart(product(1, 10), 2);
        cart.clear_cart();

        assert!(cart.items().is_empty());
        let slot: Option<serde_json::Value> = storage.load(keys::CART, None);
        assert!(slot.is_none());
    }

    #[test]
    fn test_corrupt_slot_rehydrates_empty() {
        let storage = Storage::in_memory();
        storage.save(keys::CART, &"definitely not a cart".to_string());

        let cart = CartStore::new(storage);
        assert!(cart.items().is_empty());
    }
}
