//! Storefront library.
//!
//! A resilient client for the product catalog API plus the client-side state
//! of a shop: cart, wishlist and pagination. The `storefront` binary in the
//! CLI crate drives it; the integration tests use it directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod pagination;
pub mod state;
pub mod storage;
pub mod store;

pub use catalog::{CatalogClient, CatalogError};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use state::AppState;
