//! Application state owned by one front-end session.

use std::sync::Arc;

use storefront_core::ProductId;
use tracing::info;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::pagination::Pagination;
use crate::storage::{FileStorage, Storage};
use crate::store::{CartStore, WishlistStore};

/// Configuration, catalog client and both stores for one execution context.
///
/// Stores are mutated through `&mut self`, so a mutation can never interleave
/// with another one on the same state.
#[derive(Debug)]
pub struct AppState {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `storage` - Backend the cart and wishlist are rehydrated from
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let cart = CartStore::load(Arc::clone(&storage));
        let wishlist = WishlistStore::load(storage);

        info!(
            cart_items = cart.item_count(),
            wishlist_items = wishlist.len(),
            "storefront state ready"
        );

        Ok(Self {
            config,
            catalog,
            cart,
            wishlist,
        })
    }

    /// Create a state persisted under the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let storage = Arc::new(FileStorage::new(config.storage.data_dir.clone()));
        Self::new(config, storage)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the product catalog client.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    /// Move a saved product from the wishlist into the cart with quantity 1.
    ///
    /// Returns `false` if the product is not in the wishlist.
    pub fn move_to_cart(&mut self, id: ProductId) -> bool {
        let Some(product) = self.wishlist.remove_item(id) else {
            return false;
        };
        self.cart.add_item(product, 1);
        true
    }

    /// Pagination over `items` with the configured page size.
    #[must_use]
    pub const fn paginate<T>(&self, items: &[T]) -> Pagination {
        Pagination::for_items(items, self.config.page_size)
    }
}
