//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `VOLT_API_BASE_URL` - REST API root (default: the hosted Volt Store API)
//! - `VOLT_STORAGE_PATH` - Local storage file (default: `<data dir>/volt/storage.json`)
//! - `VOLT_PRODUCT_CACHE_TTL_SECS` - Product lookup cache lifetime (default: 300)
//! - `VOLT_HTTP_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `VOLT_LOG_JSON` - Emit JSON log lines when `true` or `1`

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Hosted store API.
pub const DEFAULT_API_BASE_URL: &str = "https://ecommerce-store-e805668c131b.herokuapp.com/api/v1";

const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory on this platform; set VOLT_STORAGE_PATH")]
    NoDataDir,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST API configuration
    pub api: ApiConfig,
    /// File backing the local key-value store
    pub storage_path: PathBuf,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root with a trailing slash; endpoint paths are joined onto it
    pub base_url: Url,
    /// How long product lookups stay cached
    pub product_cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value, or if
    /// no storage path is set and the platform has no data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_path = match get_optional_env("VOLT_STORAGE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_storage_path().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api: ApiConfig::from_env()?,
            storage_path,
            log_json: parse_flag(get_optional_env("VOLT_LOG_JSON").as_deref()),
        })
    }
}

impl ApiConfig {
    /// Configuration for the API at `base_url` with default cache lifetime
    /// and timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("VOLT_API_BASE_URL", base_url)?,
            product_cache_ttl: Duration::from_secs(DEFAULT_PRODUCT_CACHE_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "VOLT_API_BASE_URL",
            &get_env_or_default("VOLT_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let product_cache_ttl = parse_secs(
            "VOLT_PRODUCT_CACHE_TTL_SECS",
            &get_env_or_default(
                "VOLT_PRODUCT_CACHE_TTL_SECS",
                &DEFAULT_PRODUCT_CACHE_TTL_SECS.to_string(),
            ),
        )?;
        let timeout = parse_secs(
            "VOLT_HTTP_TIMEOUT_SECS",
            &get_env_or_default("VOLT_HTTP_TIMEOUT_SECS", &DEFAULT_HTTP_TIMEOUT_SECS.to_string()),
        )?;

        Ok(Self {
            base_url,
            product_cache_ttl,
            timeout,
        })
    }
}

/// Default location of the local storage file.
#[must_use]
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("volt").join("storage.json"))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an API root. A trailing slash is added so relative joins keep the
/// last path segment.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/"))
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a positive number of seconds.
fn parse_secs(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}
