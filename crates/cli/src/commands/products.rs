//! Catalog browsing commands.

use storefront::catalog::{ProductFilter, SortOrder};
use storefront::pagination::{PageToken, Pagination};
use storefront::{AppError, AppState, CatalogError};
use storefront_core::{Product, id_from_slug};
use tracing::info;

use super::product_row;

/// Options for the `products` listing.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub filter: ProductFilter,
    pub sort: SortOrder,
    pub page: usize,
    pub per_page: Option<usize>,
}

/// List products, filtered, sorted and paginated.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(state: &AppState, query: ListQuery) -> Result<(), AppError> {
    let products = match &query.filter.category {
        Some(category) => state.catalog().products_in_category(category).await?,
        None => state.catalog().all_products().await?,
    };

    let mut products = query.filter.apply(products);
    query.sort.sort(&mut products);

    let mut pagination = query.per_page.map_or_else(
        || state.paginate(&products),
        |per_page| Pagination::for_items(&products, per_page),
    );
    pagination.go_to_page(query.page);

    info!(
        total = products.len(),
        page = pagination.current_page(),
        "listing products"
    );
    print_page(&products, &pagination);
    Ok(())
}

/// Show a single product by ID or slug.
///
/// # Errors
///
/// Returns an error if the reference is malformed, the product does not
/// exist, or the catalog cannot be fetched.
pub async fn show(state: &AppState, reference: &str) -> Result<(), AppError> {
    let id = id_from_slug(reference)?;
    let product = match state.catalog().product(id).await {
        Ok(product) => product,
        Err(CatalogError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("product {reference}")));
        }
        Err(e) => return Err(e.into()),
    };

    print_details(
        &product,
        state.cart().line(id).map(|line| line.quantity),
        state.wishlist().is_in_wishlist(id),
    );
    Ok(())
}

/// List every category.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn categories(state: &AppState) -> Result<(), AppError> {
    let categories = state.catalog().categories().await?;
    print_lines(&categories);
    Ok(())
}

/// Search titles and descriptions.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn search(state: &AppState, query: &str, page: usize) -> Result<(), AppError> {
    let results = state.catalog().search(query).await?;
    let mut pagination = state.paginate(&results);
    pagination.go_to_page(page);

    info!(query, matches = results.len(), "search complete");
    print_page(&results, &pagination);
    Ok(())
}

/// Render a pagination bar with the current page in brackets.
#[must_use]
pub fn page_bar(pagination: &Pagination) -> String {
    pagination
        .page_tokens()
        .iter()
        .map(|token| match token {
            PageToken::Page(n) if *n == pagination.current_page() => format!("[{n}]"),
            token => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[allow(clippy::print_stdout)]
fn print_page(products: &[Product], pagination: &Pagination) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }

    for product in pagination.slice(products) {
        println!("{}", product_row(product));
    }

    let (first, last) = pagination.display_range();
    println!();
    println!("Showing {first}-{last} of {}", pagination.total_items());
    if pagination.total_pages() > 1 {
        println!("Pages: {}", page_bar(pagination));
    }
}

#[allow(clippy::print_stdout)]
fn print_details(product: &Product, in_cart: Option<u32>, saved: bool) {
    println!("{}", product.title);
    println!("  ID:        {}", product.id);
    println!("  Slug:      {}", product.slug());
    println!("  Price:     {}", product.display_price());
    println!("  Category:  {}", product.category);
    if let Some(rating) = product.rating {
        println!("  Rating:    {:.1} ({} reviews)", rating.rate, rating.count);
    }
    println!("  Image:     {}", product.image);
    if let Some(quantity) = in_cart {
        println!("  In cart:   {quantity}");
    }
    if saved {
        println!("  Saved to wishlist");
    }
    println!();
    println!("{}", product.description);
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bar_marks_current_page() {
        let mut pagination = Pagination::new(100, 10);
        pagination.go_to_page(6);
        assert_eq!(page_bar(&pagination), "1 … 5 [6] 7 … 10");
    }

    #[test]
    fn test_page_bar_small() {
        let pagination = Pagination::new(21, 9);
        assert_eq!(page_bar(&pagination), "[1] 2 3");
    }
}
