//! Catalog product types.
//!
//! The JSON shape matches the upstream catalog API exactly, so the same type
//! deserializes live responses, the bundled fallback snapshot and persisted
//! cart/wishlist snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::format_price;
use super::slug::generate_slug;

/// Average review score and number of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating value (e.g., 4.5).
    pub rate: f64,
    /// Total number of reviews.
    pub count: u32,
}

/// A product from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price, serialized as a JSON number like the upstream API.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Long-form description.
    pub description: String,
    /// Category name (e.g., "electronics").
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Review summary, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// URL-friendly slug for this product (e.g., "mens-cotton-jacket-3").
    #[must_use]
    pub fn slug(&self) -> String {
        generate_slug(&self.title, self.id)
    }

    /// Unit price formatted for display.
    #[must_use]
    pub fn display_price(&self) -> String {
        format_price(self.price)
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const API_PRODUCT: &str = r#"{
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        "price": 109.95,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
    }"#;

    #[test]
    fn test_deserialize_api_shape() {
        let product: Product = serde_json::from_str(API_PRODUCT).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(10995, 2));
        assert_eq!(product.rating.unwrap().count, 120);
    }

    #[test]
    fn test_integer_price_and_missing_rating() {
        let product: Product = serde_json::from_str(
            r#"{"id":2,"title":"Mug","price":22,"description":"","category":"home","image":""}"#,
        )
        .unwrap();
        assert_eq!(product.price, Decimal::new(22, 0));
        assert!(product.rating.is_none());
    }

    #[test]
    fn test_price_serializes_as_number() {
        let product: Product = serde_json::from_str(API_PRODUCT).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert!(value["price"].is_number());
        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_matches_lowercase() {
        let product: Product = serde_json::from_str(API_PRODUCT).unwrap();
        assert!(product.matches_lowercase("backpack"));
        assert!(product.matches_lowercase("forest"));
        assert!(!product.matches_lowercase("jacket"));
    }

    #[test]
    fn test_slug_and_display_price() {
        let product: Product = serde_json::from_str(API_PRODUCT).unwrap();
        assert_eq!(
            product.slug(),
            "fjallraven-foldsack-no-1-backpack-fits-15-laptops-1"
        );
        assert_eq!(product.display_price(), "$109.95");
    }
}
