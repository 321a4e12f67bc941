//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything the storefront exposes to
//! a front end. Server-class failures are captured to Sentry by
//! [`AppError::report`] before being shown to the user.

use storefront_core::SlugError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting or loading local state failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Product reference could not be parsed.
    #[error("Invalid product reference: {0}")]
    Slug(#[from] SlugError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error indicates a fault on our side or upstream rather
    /// than bad user input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Catalog(err) => !matches!(err, CatalogError::NotFound(_)),
            Self::Storage(_) | Self::Config(_) => true,
            Self::Slug(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Log the error, capturing server errors to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::warn!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust
/// storefront::error::add_breadcrumb("cart", "Added to cart", &[("product_id", "123")]);
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
