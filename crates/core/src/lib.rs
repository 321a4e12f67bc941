//! Storefront Core - Shared types library.
//!
//! This crate provides common types used across all storefront components:
//! - `storefront` - Catalog client, cart, wishlist and pagination
//! - `cli` - Command-line front end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, type-safe IDs, prices and product slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
