//! Catalog client error types.

use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur when talking to the product catalog API.
///
/// The type is `Clone` so that a single upstream failure can be handed to
/// every caller that was waiting on the same coalesced request.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(Arc<reqwest::Error>),

    /// Request exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// API answered 403 Forbidden. Permanent, never retried.
    #[error("Catalog API blocked the request (403 Forbidden): {0}")]
    Blocked(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(Arc<serde_json::Error>),

    /// Endpoint URL could not be built.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Bundled or configured fallback snapshot could not be loaded.
    #[error("Fallback catalog unavailable: {0}")]
    Fallback(String),

    /// A cached entry did not hold the type its key implies.
    #[error("Unexpected cache entry for {0}")]
    CacheMismatch(String),
}

impl CatalogError {
    /// Whether a retry may succeed.
    ///
    /// Transport failures, timeouts, 408, 429 and 5xx are transient; every
    /// other failure is permanent.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            _ => false,
        }
    }

    /// Whether retrying is pointless.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !self.is_retryable()
    }

    /// Whether this is the permanent "blocked" failure class.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    /// Whether serving the fallback snapshot is an acceptable answer.
    ///
    /// `NotFound` is a real answer from the catalog and local construction
    /// errors are bugs, so neither is masked by the fallback.
    #[must_use]
    pub const fn allows_fallback(&self) -> bool {
        !matches!(
            self,
            Self::NotFound(_) | Self::InvalidUrl(_) | Self::Fallback(_)
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            let url = error
                .url()
                .map_or_else(|| "(unknown url)".to_string(), ToString::to_string);
            Self::Timeout(url)
        } else {
            Self::Http(Arc::new(error))
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(Arc::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> CatalogError {
        CatalogError::Status {
            status: code,
            message: String::new(),
        }
    }

    #[test]
    fn test_server_errors_are_retryable() {
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(408).is_retryable());
        assert!(CatalogError::Timeout("http://x".to_string()).is_retryable());
    }

    #[test]
    fn test_permanent_errors_are_not_retryable() {
        assert!(!status(400).is_retryable());
        assert!(!CatalogError::Blocked("/products".to_string()).is_retryable());
        assert!(!CatalogError::NotFound("/products/99".to_string()).is_retryable());
        assert!(status(404).is_permanent());
    }

    #[test]
    fn test_fallback_eligibility() {
        assert!(CatalogError::Blocked("/products".to_string()).allows_fallback());
        assert!(status(503).allows_fallback());
        assert!(!CatalogError::NotFound("/products/99".to_string()).allows_fallback());
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Blocked("https://fakestoreapi.com/products".to_string());
        assert_eq!(
            err.to_string(),
            "Catalog API blocked the request (403 Forbidden): https://fakestoreapi.com/products"
        );
        assert_eq!(status(502).to_string(), "API error: 502 - ");
    }
}
