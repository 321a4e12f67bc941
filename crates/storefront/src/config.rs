//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Catalog
//! - `CATALOG_BASE_URL` - Product API base URL (default: <https://fakestoreapi.com>)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `CATALOG_MAX_RETRIES` - Retries after the first attempt (default: 5)
//! - `CATALOG_INITIAL_BACKOFF_MS` - Delay before the first retry (default: 2000)
//! - `CATALOG_MAX_BACKOFF_MS` - Upper bound for any retry delay (default: 10000)
//! - `CATALOG_BACKOFF_MULTIPLIER` - Delay growth factor (default: 2)
//! - `CATALOG_CACHE_TTL_SECS` - Response cache TTL, 0 keeps no responses (default: 60)
//! - `CATALOG_CACHE_CAPACITY` - Maximum cached responses (default: 1000)
//! - `CATALOG_FALLBACK` - Serve the bundled snapshot when the API fails (default: true)
//! - `CATALOG_FALLBACK_PATH` - Snapshot file to use instead of the bundled one
//!
//! ## Storefront
//! - `STOREFRONT_DATA_DIR` - Directory for cart and wishlist snapshots (default: .storefront)
//! - `STOREFRONT_PAGE_SIZE` - Products per page (default: 9)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::RetryPolicy;
use crate::pagination::DEFAULT_PAGE_SIZE;

const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
const DEFAULT_USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product catalog API configuration
    pub catalog: CatalogConfig,
    /// Local persistence configuration
    pub storage: StorageConfig,
    /// Products per listing page
    pub page_size: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            storage: StorageConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

/// Product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API base URL
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry and backoff policy
    pub retry: RetryPolicy,
    /// Response cache TTL; zero keeps no responses
    pub cache_ttl: Duration,
    /// Maximum number of cached responses
    pub cache_capacity: u64,
    /// Where answers come from when the API is unavailable
    pub fallback: FallbackSource,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 1000,
            fallback: FallbackSource::Bundled,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Source of the catalog snapshot served when the live API fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FallbackSource {
    /// Propagate errors to the caller.
    Disabled,
    /// Snapshot compiled into the binary.
    #[default]
    Bundled,
    /// Snapshot read from a JSON file at startup.
    File(PathBuf),
}

/// Local persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one JSON file per store
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".storefront"),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_lookup(&env)?;
        let storage = StorageConfig {
            data_dir: PathBuf::from(get_env_or_default(&env, "STOREFRONT_DATA_DIR", ".storefront")),
        };
        let page_size = parse_env(&env, "STOREFRONT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        Ok(Self {
            catalog,
            storage,
            page_size,
            sentry_dsn: get_optional_env(&env, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&env, "SENTRY_ENVIRONMENT"),
        })
    }
}

impl CatalogConfig {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_env_or_default(env, "CATALOG_BASE_URL", DEFAULT_BASE_URL);
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e.to_string())
        })?;

        let retry = RetryPolicy {
            max_retries: parse_env(env, "CATALOG_MAX_RETRIES", 5)?,
            initial_delay: Duration::from_millis(parse_env(env, "CATALOG_INITIAL_BACKOFF_MS", 2000)?),
            max_delay: Duration::from_millis(parse_env(env, "CATALOG_MAX_BACKOFF_MS", 10_000)?),
            multiplier: parse_env(env, "CATALOG_BACKOFF_MULTIPLIER", 2)?,
        };

        let fallback = if parse_bool(env, "CATALOG_FALLBACK", true)? {
            get_optional_env(env, "CATALOG_FALLBACK_PATH")
                .map_or(FallbackSource::Bundled, |path| {
                    FallbackSource::File(PathBuf::from(path))
                })
        } else {
            FallbackSource::Disabled
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(parse_env(env, "CATALOG_TIMEOUT_SECS", 30)?),
            retry,
            cache_ttl: Duration::from_secs(parse_env(env, "CATALOG_CACHE_TTL_SECS", 60)?),
            cache_capacity: parse_env(env, "CATALOG_CACHE_CAPACITY", 1000)?,
            fallback,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional_env(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_env<T>(env: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_env(env, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_bool(env: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(env, key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}
