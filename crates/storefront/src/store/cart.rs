//! Shopping cart store.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::{Product, ProductId, format_price};
use tokio::sync::watch;
use tracing::debug;

use super::{load_items, persist_or_warn, save_items};
use crate::error::add_breadcrumb;
use crate::storage::{Storage, StorageError};

/// Storage key for the cart snapshot.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// One product and its quantity in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1 for a line held by a [`CartStore`].
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Cart lines keyed by product, in insertion order.
///
/// Every mutation is published to subscribers and persisted before the
/// method returns.
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: Arc<dyn Storage>,
    tx: watch::Sender<Vec<CartLine>>,
}

impl CartStore {
    /// Rehydrate the cart from `storage`.
    ///
    /// Empty lines are dropped and repeated products are merged into their
    /// first line.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut lines: Vec<CartLine> = Vec::new();
        for line in load_items::<CartLine>(storage.as_ref(), CART_STORAGE_KEY) {
            if line.quantity == 0 {
                continue;
            }
            match lines.iter_mut().find(|l| l.product.id == line.product.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }
        debug!(lines = lines.len(), "cart loaded");

        let (tx, _) = watch::channel(lines.clone());
        Self { lines, storage, tx }
    }

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// A quantity of zero is a no-op.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let id = product.id;
        if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { product, quantity });
        }

        let (id_str, quantity_str) = (id.to_string(), quantity.to_string());
        add_breadcrumb(
            "cart",
            "Added to cart",
            &[("product_id", id_str.as_str()), ("quantity", quantity_str.as_str())],
        );
        self.commit();
    }

    /// Set the quantity of an existing line. Zero or less removes the line;
    /// unknown products are ignored.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.product.id == id) else {
            return;
        };
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let (id_str, quantity_str) = (id.to_string(), quantity.to_string());
        add_breadcrumb(
            "cart",
            "Updated cart quantity",
            &[("product_id", id_str.as_str()), ("quantity", quantity_str.as_str())],
        );
        self.commit();
    }

    /// Remove the line for `id`, if present.
    pub fn remove_item(&mut self, id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != id);
        if self.lines.len() == before {
            return;
        }

        let id_str = id.to_string();
        add_breadcrumb("cart", "Removed from cart", &[("product_id", id_str.as_str())]);
        self.commit();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        add_breadcrumb("cart", "Cleared cart", &[]);
        self.commit();
    }

    /// Sum of line totals, unrounded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total formatted for display, e.g. `$12.34`.
    #[must_use]
    pub fn display_total(&self) -> String {
        format_price(self.total())
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Receive the current lines now and after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLine>> {
        self.tx.subscribe()
    }

    /// Write the current lines to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or written.
    pub fn persist(&self) -> Result<(), StorageError> {
        save_items(self.storage.as_ref(), CART_STORAGE_KEY, &self.lines)
    }

    fn commit(&self) {
        self.tx.send_replace(self.lines.clone());
        persist_or_warn(self.storage.as_ref(), CART_STORAGE_KEY, &self.lines);
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: i64, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Decimal::from_str(price).unwrap(),
            description: String::new(),
            category: "electronics".to_string(),
            image: String::new(),
            rating: None,
        }
    }

    fn empty_cart() -> CartStore {
        CartStore::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_same_product_twice_merges_lines() {
        let mut cart = empty_cart();
        cart.add_item(product(1, "10.00"), 1);
        cart.add_item(product(1, "10.00"), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(product(1, "10.00"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = empty_cart();
        cart.add_item(product(1, "10.00"), 2);
        cart.add_item(product(2, "5.00"), 1);

        cart.update_quantity(ProductId::new(1), 0);

        assert!(!cart.contains(ProductId::new(1)));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_negative_removes_line() {
        let mut cart = empty_cart();
        cart.add_item(product(1, "10.00"), 2);
        cart.update_quantity(ProductId::new(1), -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_replaces_quantity_and_ignores_unknown() {
        let mut cart = empty_cart();
        cart.add_item(product(1, "10.00"), 2);

        cart.update_quantity(ProductId::new(1), 5);
        cart.update_quantity(ProductId::new(99), 3);

        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 5);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_total_and_display() {
        let mut cart = empty_cart();
        cart.add_item(product(1, "10.99"), 2);
        cart.add_item(product(2, "5.5"), 1);

        assert_eq!(cart.total(), Decimal::from_str("27.48").unwrap());
        assert_eq!(cart.display_total(), "$27.48");
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = empty_cart();
        cart.add_item(product(3, "1"), 1);
        cart.add_item(product(1, "1"), 1);
        cart.add_item(product(3, "1"), 1);

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.product.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_subscribers_see_changes_immediately() {
        let mut cart = empty_cart();
        let mut rx = cart.subscribe();

        cart.add_item(product(1, "10.00"), 1);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        cart.clear();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_rehydrates_from_storage() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let mut cart = CartStore::load(Arc::clone(&storage));
        cart.add_item(product(1, "10.00"), 2);
        cart.add_item(product(2, "3.25"), 1);
        drop(cart);

        let cart = CartStore::load(storage);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Decimal::from_str("23.25").unwrap());
    }

    #[test]
    fn test_load_merges_repeated_products() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let lines = vec![
            CartLine {
                product: product(1, "10.00"),
                quantity: 2,
            },
            CartLine {
                product: product(2, "1.00"),
                quantity: 1,
            },
            CartLine {
                product: product(1, "10.00"),
                quantity: 3,
            },
            CartLine {
                product: product(2, "1.00"),
                quantity: u32::MAX,
            },
        ];
        save_items(storage.as_ref(), CART_STORAGE_KEY, &lines).unwrap();

        let mut cart = CartStore::load(storage);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity, 5);
        assert_eq!(cart.line(ProductId::new(2)).unwrap().quantity, u32::MAX);

        cart.update_quantity(ProductId::new(1), 1);
        cart.remove_item(ProductId::new(2));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 1);
    }
}
