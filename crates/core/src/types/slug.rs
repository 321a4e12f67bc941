//! URL-friendly product slugs.
//!
//! A slug is the lowercased title with every run of characters outside
//! `[a-z0-9]` collapsed into a single `-`, followed by `-{id}`.

use std::sync::LazyLock;

use regex::Regex;

use super::id::ProductId;

#[allow(clippy::expect_used)] // Static pattern, verified by tests
static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

/// Errors that can occur when reading a product ID back out of a slug.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The trailing segment is not an integer.
    #[error("invalid product slug: {0}")]
    InvalidSlug(String),
}

/// Generate a slug from a product title and ID.
///
/// ```
/// use storefront_core::{ProductId, generate_slug};
///
/// let slug = generate_slug("Mens Casual Premium Slim Fit T-Shirts ", ProductId::new(2));
/// assert_eq!(slug, "mens-casual-premium-slim-fit-t-shirts-2");
/// ```
#[must_use]
pub fn generate_slug(title: &str, id: ProductId) -> String {
    let lower = title.to_lowercase();
    let collapsed = NON_ALPHANUMERIC.replace_all(&lower, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        id.to_string()
    } else {
        format!("{trimmed}-{id}")
    }
}

/// Extract the product ID from a slug.
///
/// A bare integer is accepted as well, so either form can be used to address
/// a product.
///
/// # Errors
///
/// Returns [`SlugError::InvalidSlug`] if the segment after the last `-` is
/// not an integer.
pub fn id_from_slug(slug: &str) -> Result<ProductId, SlugError> {
    let last = slug.rsplit('-').next().unwrap_or(slug);
    last.parse::<i64>()
        .map(ProductId::new)
        .map_err(|_| SlugError::InvalidSlug(slug.to_string()))
}
