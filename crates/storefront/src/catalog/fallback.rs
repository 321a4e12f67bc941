//! Static catalog snapshot served when the live API is unavailable.

use std::path::Path;
use std::sync::Arc;

use storefront_core::{Product, ProductId};

use super::CatalogError;

/// Snapshot compiled into the binary.
const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

/// An in-memory copy of the catalog with the same query surface as the API.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    products: Arc<[Product]>,
}

impl FallbackCatalog {
    /// Load the snapshot bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON does not parse.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_PRODUCTS)
    }

    /// Load a snapshot from a JSON file in the upstream product shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Fallback(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| CatalogError::Fallback(format!("invalid snapshot: {e}")))?;
        Ok(Self::from_products(products))
    }

    /// Build a snapshot from products already in memory.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// Number of products in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub(crate) fn all_products(&self) -> Vec<Product> {
        self.products.to_vec()
    }

    pub(crate) fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Product not found: {id}")))
    }

    pub(crate) fn products_in_category(&self, category: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    /// Unique categories in first-seen order.
    pub(crate) fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in self.products.iter() {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}
