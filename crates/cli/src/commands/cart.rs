//! Cart commands.

use storefront::store::CartStore;
use storefront::{AppError, AppState};
use storefront_core::{ProductId, format_price};
use tracing::info;

use super::fetch_product;

/// Print the cart.
pub fn show(state: &AppState) {
    print_cart(state.cart());
}

/// Add `qty` of a product to the cart.
///
/// # Errors
///
/// Returns an error if the quantity is zero, the product does not exist, or
/// the catalog cannot be fetched.
pub async fn add(state: &mut AppState, id: i64, qty: u32) -> Result<(), AppError> {
    if qty == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }

    let id = ProductId::new(id);
    let product = fetch_product(state, id).await?;
    let title = product.title.clone();

    state.cart_mut().add_item(product, qty);
    info!(product_id = %id, qty, "added to cart");

    print_message(&format!("Added {qty} × {title} to the cart."));
    print_cart(state.cart());
    Ok(())
}

/// Set the quantity of a cart line; zero or less removes it.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn update(state: &mut AppState, id: i64, qty: i64) -> Result<(), AppError> {
    let id = ProductId::new(id);
    ensure_in_cart(state, id)?;

    state.cart_mut().update_quantity(id, qty);
    info!(product_id = %id, qty, "cart quantity updated");

    print_cart(state.cart());
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn remove(state: &mut AppState, id: i64) -> Result<(), AppError> {
    let id = ProductId::new(id);
    ensure_in_cart(state, id)?;

    state.cart_mut().remove_item(id);
    info!(product_id = %id, "removed from cart");

    print_cart(state.cart());
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &mut AppState) {
    state.cart_mut().clear();
    print_message("Cart cleared.");
}

fn ensure_in_cart(state: &AppState, id: ProductId) -> Result<(), AppError> {
    if state.cart().contains(id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("product {id} is not in the cart")))
    }
}

/// Render the cart as text.
#[must_use]
pub fn render_cart(cart: &CartStore) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    for line in cart.lines() {
        out.push_str(&format!(
            "{:>4}  {:>3} × {:<9} {:>10}  {}\n",
            line.product.id,
            line.quantity,
            line.product.display_price(),
            format_price(line.line_total()),
            line.product.title,
        ));
    }
    out.push_str(&format!(
        "\n{} item(s), total {}",
        cart.item_count(),
        cart.display_total()
    ));
    out
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartStore) {
    println!("{}", render_cart(cart));
}

#[allow(clippy::print_stdout)]
fn print_message(message: &str) {
    println!("{message}");
}
