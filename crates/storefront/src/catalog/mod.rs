//! Product catalog API client implementation.
//!
//! Uses `reqwest` for HTTP and caches responses using `moka` (60-second TTL by
//! default). Every request is retried with exponential backoff; when the API
//! stays unavailable, or blocks us outright, answers come from a static
//! snapshot of the catalog instead.

mod cache;
mod error;
mod fallback;
mod filter;
mod retry;

use std::sync::Arc;

use futures::future::join_all;
use moka::future::Cache;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use storefront_core::{Product, ProductId};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{CatalogConfig, FallbackSource};

pub use cache::{CacheKey, CacheValue};
pub use error::CatalogError;
pub use fallback::FallbackCatalog;
pub use filter::{ProductFilter, SortOrder, SortOrderParseError};
pub use retry::{RetryPolicy, with_retry};

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the request
/// cache. Identical concurrent requests are coalesced into one upstream call.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    user_agent: String,
    retry: RetryPolicy,
    cache: Cache<CacheKey, CacheValue>,
    /// False when the TTL is zero: the cache then only shares in-flight requests.
    keep_responses: bool,
    fallback: Option<FallbackCatalog>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retry", &self.inner.retry)
            .field("keep_responses", &self.inner.keep_responses)
            .field("fallback", &self.inner.fallback.as_ref().map(FallbackCatalog::len))
            .finish()
    }
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the HTTP client fails to
    /// build, or the configured fallback snapshot cannot be loaded.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let keep_responses = !config.cache_ttl.is_zero();
        let mut cache = Cache::builder().max_capacity(config.cache_capacity);
        if keep_responses {
            cache = cache.time_to_live(config.cache_ttl);
        }
        let cache = cache.build();

        let fallback = match &config.fallback {
            FallbackSource::Disabled => None,
            FallbackSource::Bundled => Some(FallbackCatalog::bundled()?),
            FallbackSource::File(path) => Some(FallbackCatalog::from_path(path)?),
        };

        debug!(
            base_url = %base_url,
            max_retries = config.retry.max_retries,
            cache_ttl_secs = config.cache_ttl.as_secs(),
            fallback = fallback.is_some(),
            "catalog client created"
        );

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url,
                user_agent: config.user_agent.clone(),
                retry: config.retry,
                cache,
                keep_responses,
                fallback,
            }),
        })
    }

    /// Issue a single GET and return the body of a successful response.
    async fn get_text(&self, url: &Url) -> Result<String, CatalogError> {
        let response = self
            .inner
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.inner.user_agent)
            .send()
            .await?;

        let status = response.status();

        // A 403 here is a permanent block, not a transient failure
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(CatalogError::Blocked(url.to_string()));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// Fetch and decode one endpoint, retrying transient failures.
    async fn fetch_live(&self, key: &CacheKey) -> Result<CacheValue, CatalogError> {
        let url = self.inner.base_url.join(&key.path())?;
        let operation = key.to_string();

        let url_ref = &url;
        let body = with_retry(&self.inner.retry, &operation, |attempt| async move {
            debug!(attempt, url = %url_ref, "GET catalog");
            self.get_text(url_ref).await
        })
        .await?;

        let value = match key {
            CacheKey::Products | CacheKey::Category(_) => {
                CacheValue::Products(decode::<Vec<Product>>(&body)?.into())
            }
            CacheKey::Product(id) => {
                // The API answers unknown ids with an empty 200
                let trimmed = body.trim();
                if trimmed.is_empty() || trimmed == "null" {
                    return Err(CatalogError::NotFound(format!("Product not found: {id}")));
                }
                CacheValue::Product(Arc::new(decode::<Product>(&body)?))
            }
            CacheKey::Categories => CacheValue::Categories(decode::<Vec<String>>(&body)?.into()),
        };

        Ok(value)
    }

    /// Fetch through the request cache. Errors are never cached.
    ///
    /// Identical requests in flight share one upstream call even when
    /// responses are not kept.
    async fn fetch(&self, key: CacheKey) -> Result<CacheValue, CatalogError> {
        let cache = &self.inner.cache;
        if self.inner.keep_responses {
            if let Some(value) = cache.get(&key).await {
                debug!(key = %key, "Cache hit");
                return Ok(value);
            }
        }

        let result = cache
            .try_get_with(key.clone(), self.fetch_live(&key))
            .await
            .map_err(|e| (*e).clone());

        if !self.inner.keep_responses {
            cache.invalidate(&key).await;
        }
        result
    }

    /// Serve from the fallback snapshot if the error and configuration allow it.
    fn fall_back<T>(
        &self,
        error: CatalogError,
        key: &CacheKey,
        lookup: impl FnOnce(&FallbackCatalog) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        match &self.inner.fallback {
            Some(fallback) if error.allows_fallback() => {
                warn!(key = %key, error = %error, "catalog unavailable, serving bundled snapshot");
                lookup(fallback)
            }
            _ => Err(error),
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails and no fallback is configured.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Vec<Product>, CatalogError> {
        let key = CacheKey::Products;
        match self.fetch(key.clone()).await {
            Ok(CacheValue::Products(products)) => Ok(products.to_vec()),
            Ok(_) => Err(CatalogError::CacheMismatch(key.to_string())),
            Err(e) => self.fall_back(e, &key, |fb| Ok(fb.all_products())),
        }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product does not exist, or an
    /// error if the API request fails and no fallback is configured.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);
        match self.fetch(key.clone()).await {
            Ok(CacheValue::Product(product)) => Ok((*product).clone()),
            Ok(_) => Err(CatalogError::CacheMismatch(key.to_string())),
            Err(e) => self.fall_back(e, &key, |fb| fb.product(id)),
        }
    }

    /// Get the products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails and no fallback is configured.
    #[instrument(skip(self))]
    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        // These would resolve to another endpoint once joined onto the base URL
        if matches!(category, "" | "." | "..") {
            return Err(CatalogError::NotFound(format!(
                "Category not found: {category:?}"
            )));
        }

        let key = CacheKey::Category(category.to_string());
        match self.fetch(key.clone()).await {
            Ok(CacheValue::Products(products)) => Ok(products.to_vec()),
            Ok(_) => Err(CatalogError::CacheMismatch(key.to_string())),
            Err(e) => self.fall_back(e, &key, |fb| Ok(fb.products_in_category(category))),
        }
    }

    /// Get every category name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails and no fallback is configured.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let key = CacheKey::Categories;
        match self.fetch(key.clone()).await {
            Ok(CacheValue::Categories(categories)) => Ok(categories.to_vec()),
            Ok(_) => Err(CatalogError::CacheMismatch(key.to_string())),
            Err(e) => self.fall_back(e, &key, |fb| Ok(fb.categories())),
        }
    }

    /// Search products by title or description (case-insensitive substring).
    ///
    /// The catalog API has no search endpoint, so this filters the full
    /// product list locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let needle = query.to_lowercase();
        let products = self.all_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.matches_lowercase(&needle))
            .collect())
    }

    /// Fetch several products concurrently, in input order.
    ///
    /// Unknown IDs yield `None`.
    ///
    /// # Errors
    ///
    /// Returns the first error other than [`CatalogError::NotFound`].
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Option<Product>>, CatalogError> {
        let results = join_all(ids.iter().map(|id| self.product(*id))).await;

        results
            .into_iter()
            .map(|result| match result {
                Ok(product) => Ok(Some(product)),
                Err(CatalogError::NotFound(_)) => Ok(None),
                Err(e) => Err(e),
            })
            .collect()
    }

    /// Warm the product list cache in the background.
    pub fn prefetch_products(&self) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.all_products().await {
                debug!(error = %e, "product prefetch failed");
            }
        })
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate one cached response.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.cache.invalidate(key).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Decode a JSON body, logging an excerpt on failure.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse catalog response"
        );
        CatalogError::from(e)
    })
}
