//! Wishlist store: a set of products in insertion order.

use std::sync::Arc;

use storefront_core::{Product, ProductId};
use tokio::sync::watch;
use tracing::debug;

use super::{load_items, persist_or_warn, save_items};
use crate::error::add_breadcrumb;
use crate::storage::{Storage, StorageError};

/// Storage key for the wishlist snapshot.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";

/// Saved products, unique by product ID.
pub struct WishlistStore {
    items: Vec<Product>,
    storage: Arc<dyn Storage>,
    tx: watch::Sender<Vec<Product>>,
}

impl WishlistStore {
    /// Rehydrate the wishlist from `storage`, dropping duplicate entries.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut items: Vec<Product> = Vec::new();
        for product in load_items::<Product>(storage.as_ref(), WISHLIST_STORAGE_KEY) {
            if !items.iter().any(|p| p.id == product.id) {
                items.push(product);
            }
        }
        debug!(items = items.len(), "wishlist loaded");

        let (tx, _) = watch::channel(items.clone());
        Self { items, storage, tx }
    }

    /// Add `product` unless it is already saved. Returns whether it was added.
    pub fn add_item(&mut self, product: Product) -> bool {
        if self.is_in_wishlist(product.id) {
            return false;
        }

        let id_str = product.id.to_string();
        self.items.push(product);
        add_breadcrumb("wishlist", "Added to wishlist", &[("product_id", id_str.as_str())]);
        self.commit();
        true
    }

    /// Remove the product with `id`. Returns the removed product.
    pub fn remove_item(&mut self, id: ProductId) -> Option<Product> {
        let index = self.items.iter().position(|p| p.id == id)?;
        let removed = self.items.remove(index);

        let id_str = id.to_string();
        add_breadcrumb("wishlist", "Removed from wishlist", &[("product_id", id_str.as_str())]);
        self.commit();
        Some(removed)
    }

    /// Add `product` if absent, remove it if present. Returns whether the
    /// product is saved afterwards.
    pub fn toggle_item(&mut self, product: Product) -> bool {
        if self.remove_item(product.id).is_some() {
            false
        } else {
            self.add_item(product)
        }
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Remove every saved product.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        add_breadcrumb("wishlist", "Cleared wishlist", &[]);
        self.commit();
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Receive the current items now and after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.tx.subscribe()
    }

    /// Write the current items to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or written.
    pub fn persist(&self) -> Result<(), StorageError> {
        save_items(self.storage.as_ref(), WISHLIST_STORAGE_KEY, &self.items)
    }

    fn commit(&self) {
        self.tx.send_replace(self.items.clone());
        persist_or_warn(self.storage.as_ref(), WISHLIST_STORAGE_KEY, &self.items);
    }
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
