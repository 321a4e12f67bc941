//! Wishlist commands.

use storefront::store::WishlistStore;
use storefront::{AppError, AppState};
use storefront_core::ProductId;
use tracing::info;

use super::{fetch_product, product_row};

/// Print saved products.
pub fn show(state: &AppState) {
    print_wishlist(state.wishlist());
}

/// Save a product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the catalog cannot be
/// fetched.
pub async fn add(state: &mut AppState, id: i64) -> Result<(), AppError> {
    let id = ProductId::new(id);
    if state.wishlist().is_in_wishlist(id) {
        print_message(&format!("Product {id} is already in your wishlist."));
        return Ok(());
    }

    let product = fetch_product(state, id).await?;
    state.wishlist_mut().add_item(product);
    info!(product_id = %id, "saved to wishlist");

    print_wishlist(state.wishlist());
    Ok(())
}

/// Remove a saved product.
///
/// # Errors
///
/// Returns an error if the product is not in the wishlist.
pub fn remove(state: &mut AppState, id: i64) -> Result<(), AppError> {
    let id = ProductId::new(id);
    if state.wishlist_mut().remove_item(id).is_none() {
        return Err(not_saved(id));
    }
    info!(product_id = %id, "removed from wishlist");

    print_wishlist(state.wishlist());
    Ok(())
}

/// Save the product if absent, remove it if present.
///
/// # Errors
///
/// Returns an error if the product has to be fetched and cannot be.
pub async fn toggle(state: &mut AppState, id: i64) -> Result<(), AppError> {
    let id = ProductId::new(id);

    // Only unsaved products need a catalog round trip
    let saved = match state.wishlist().item(id).cloned() {
        Some(product) => state.wishlist_mut().toggle_item(product),
        None => {
            let product = fetch_product(state, id).await?;
            state.wishlist_mut().toggle_item(product)
        }
    };
    info!(product_id = %id, saved, "wishlist toggled");

    print_message(if saved {
        "Saved to wishlist."
    } else {
        "Removed from wishlist."
    });
    Ok(())
}

/// Move a saved product into the cart.
///
/// # Errors
///
/// Returns an error if the product is not in the wishlist.
pub fn move_to_cart(state: &mut AppState, id: i64) -> Result<(), AppError> {
    let id = ProductId::new(id);
    if !state.move_to_cart(id) {
        return Err(not_saved(id));
    }
    info!(product_id = %id, "moved from wishlist to cart");

    print_message(&format!(
        "Moved product {id} to the cart ({} item(s), total {}).",
        state.cart().item_count(),
        state.cart().display_total()
    ));
    Ok(())
}

/// Remove every saved product.
pub fn clear(state: &mut AppState) {
    state.wishlist_mut().clear();
    print_message("Wishlist cleared.");
}

fn not_saved(id: ProductId) -> AppError {
    AppError::NotFound(format!("product {id} is not in the wishlist"))
}

/// Render the wishlist as text.
#[must_use]
pub fn render_wishlist(wishlist: &WishlistStore) -> String {
    if wishlist.is_empty() {
        return "Your wishlist is empty.".to_string();
    }

    let mut lines: Vec<String> = wishlist.items().iter().map(product_row).collect();
    lines.push(String::new());
    lines.push(format!("{} saved product(s)", wishlist.len()));
    lines.join("\n")
}

#[allow(clippy::print_stdout)]
fn print_wishlist(wishlist: &WishlistStore) {
    println!("{}", render_wishlist(wishlist));
}

#[allow(clippy::print_stdout)]
fn print_message(message: &str) {
    println!("{message}");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use storefront::storage::MemoryStorage;
    use storefront_core::Product;

    use super::*;

    #[test]
    fn test_render_wishlist() {
        let mut wishlist = WishlistStore::load(Arc::new(MemoryStorage::new()));
        assert_eq!(render_wishlist(&wishlist), "Your wishlist is empty.");

        wishlist.add_item(Product {
            id: ProductId::new(5),
            title: "Gold Ring".to_string(),
            price: Decimal::new(16800, 2),
            description: String::new(),
            category: "jewelery".to_string(),
            image: String::new(),
            rating: None,
        });

        let rendered = render_wishlist(&wishlist);
        assert!(rendered.contains("Gold Ring"));
        assert!(rendered.ends_with("1 saved product(s)"));
    }
}
