//! Subcommand implementations and shared output helpers.

pub mod cart;
pub mod products;
pub mod wishlist;

use storefront::{AppError, AppState, CatalogError};
use storefront_core::{Product, ProductId};

/// Fetch a product for a store mutation, turning a catalog miss into a
/// user-facing not-found error.
async fn fetch_product(state: &AppState, id: ProductId) -> Result<Product, AppError> {
    match state.catalog().product(id).await {
        Ok(product) => Ok(product),
        Err(CatalogError::NotFound(_)) => Err(AppError::NotFound(format!("product {id}"))),
        Err(e) => Err(e.into()),
    }
}

/// One-line product summary used by listings.
fn product_row(product: &Product) -> String {
    let rating = product
        .rating
        .map(|r| format!("  ★ {:.1} ({})", r.rate, r.count))
        .unwrap_or_default();
    format!(
        "{:>4}  {:<9}  {}  [{}]{rating}",
        product.id,
        product.display_price(),
        product.title,
        product.category
    )
}
