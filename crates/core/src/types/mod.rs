//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod slug;

pub use id::*;
pub use price::{Price, format_price};
pub use product::{Product, Rating};
pub use slug::{SlugError, generate_slug, id_from_slug};
