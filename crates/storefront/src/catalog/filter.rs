//! Local filtering and sorting of product lists.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use storefront_core::Product;

/// Narrow a product list by category and price range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category name.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Whether `product` passes every configured constraint.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| &product.category == category)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }

    /// Keep the products that match, preserving order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Display order for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceAscending,
    PriceDescending,
    Title,
    /// Highest average rating first; unrated products last.
    Rating,
}

impl SortOrder {
    /// Sort `products` in place. The sort is stable.
    pub fn sort(self, products: &mut [Product]) {
        match self {
            Self::Featured => {}
            Self::PriceAscending => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDescending => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::Title => products.sort_by_key(|p| p.title.to_lowercase()),
            Self::Rating => products.sort_by(|a, b| {
                let a = a.rating.map(|r| r.rate);
                let b = b.rating.map(|r| r.rate);
                match (a, b) {
                    (Some(a), Some(b)) => b.total_cmp(&a),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
        }
    }
}

/// Error parsing a [`SortOrder`] name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown sort order: {0} (expected featured, price-asc, price-desc, title or rating)")]
pub struct SortOrderParseError(String);

impl FromStr for SortOrder {
    type Err = SortOrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "price-asc" | "price_asc" => Ok(Self::PriceAscending),
            "price-desc" | "price_desc" => Ok(Self::PriceDescending),
            "title" => Ok(Self::Title),
            "rating" => Ok(Self::Rating),
            _ => Err(SortOrderParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storefront_core::{ProductId, Rating};

    use super::*;

    fn product(id: i64, category: &str, price: i64, rate: Option<f64>) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Decimal::new(price, 0),
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            rating: rate.map(|rate| Rating { rate, count: 1 }),
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.as_i64()).collect()
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let products = vec![
            product(1, "electronics", 100, None),
            product(2, "jewelery", 50, None),
            product(3, "electronics", 20, None),
        ];
        let filter = ProductFilter {
            category: Some("electronics".to_string()),
            min_price: Some(Decimal::new(50, 0)),
            max_price: None,
        };
        assert_eq!(ids(&filter.apply(products)), vec![1]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let products = vec![product(1, "a", 1, None), product(2, "b", 2, None)];
        assert_eq!(ids(&ProductFilter::default().apply(products)), vec![1, 2]);
    }

    #[test]
    fn test_sort_orders() {
        let mut products = vec![
            product(1, "a", 30, Some(2.0)),
            product(2, "a", 10, None),
            product(3, "a", 20, Some(4.5)),
        ];

        SortOrder::PriceAscending.sort(&mut products);
        assert_eq!(ids(&products), vec![2, 3, 1]);

        SortOrder::PriceDescending.sort(&mut products);
        assert_eq!(ids(&products), vec![1, 3, 2]);

        SortOrder::Rating.sort(&mut products);
        assert_eq!(ids(&products), vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_sort_order() {
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAscending);
        assert_eq!("RATING".parse::<SortOrder>().unwrap(), SortOrder::Rating);
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
