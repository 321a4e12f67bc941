//! Request cache types for catalog API responses.

use std::fmt;
use std::sync::Arc;

use storefront_core::{Product, ProductId};

/// Cache key: one variant per endpoint, carrying the endpoint's parameters.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Category(String),
    Categories,
}

impl CacheKey {
    /// Path of the endpoint relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Products => "products".to_string(),
            Self::Product(id) => format!("products/{id}"),
            Self::Category(name) => {
                format!("products/category/{}", urlencoding::encode(name))
            }
            Self::Categories => "products/categories".to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Products => f.write_str("products"),
            Self::Product(id) => write!(f, "product:{id}"),
            Self::Category(name) => write!(f, "category:{name}"),
            Self::Categories => f.write_str("categories"),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<[Product]>),
    Product(Arc<Product>),
    Categories(Arc<[String]>),
}
