//! Integration tests for the storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storefront-integration-tests
//! ```
//!
//! The upstream catalog API is replaced by an `httpmock` server; persisted
//! state lives in temporary directories.
//!
//! # Test Categories
//!
//! - `catalog_resilience` - retry, blocking, fallback and caching behaviour
//! - `stores_persistence` - cart and wishlist rehydration through file storage
//! - `pagination_scenarios` - paging real catalog listings

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::{Value, json};
use storefront::catalog::RetryPolicy;
use storefront::config::{CatalogConfig, FallbackSource, StorefrontConfig};
use storefront_core::{Product, ProductId};

/// Catalog configuration pointing at `base_url` with millisecond backoff.
#[must_use]
pub fn catalog_config(base_url: &str, fallback: FallbackSource) -> CatalogConfig {
    CatalogConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        retry: RetryPolicy {
            max_retries: 5,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2,
        },
        fallback,
        ..CatalogConfig::default()
    }
}

/// Full configuration with the catalog at `base_url`.
#[must_use]
pub fn storefront_config(base_url: &str, fallback: FallbackSource) -> StorefrontConfig {
    StorefrontConfig {
        catalog: catalog_config(base_url, fallback),
        ..StorefrontConfig::default()
    }
}

/// A product in the upstream JSON shape.
#[must_use]
pub fn product_json(id: i64, title: &str, price: f64, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "category": category,
        "image": format!("https://fakestoreapi.com/img/{id}.jpg"),
        "rating": { "rate": 4.1, "count": 120 }
    })
}

/// A product value for store tests.
#[must_use]
pub fn product(id: i64, title: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Decimal::new(cents, 2),
        description: format!("{title} description"),
        category: "electronics".to_string(),
        image: String::new(),
        rating: None,
    }
}
