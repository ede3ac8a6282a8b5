//! REST client for the store API.
//!
//! Uses `reqwest` 0.13 for HTTP. Product lookups by id are cached using
//! `moka` (5-minute TTL by default).

mod auth;
pub mod error;
mod orders;
mod products;
pub mod query;
mod ratings;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;
use volt_core::ProductId;

use crate::config::ApiConfig;

pub use error::ApiError;
use types::Product;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the store REST API.
///
/// Cheap to clone; clones share the connection pool and the product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("volt/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// API root every endpoint path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the URL of `path` with an optional encoded query.
    fn url(&self, path: &str, query: &str) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path)?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    /// Start an unauthenticated request.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.client.request(method, url)
    }

    /// Start a request carrying the bearer token.
    fn authorized(&self, method: Method, url: Url, token: &SecretString) -> RequestBuilder {
        self.request(method, url).bearer_auth(token.expose_secret())
    }

    /// Send a request and decode its JSON body.
    ///
    /// Non-success statuses become [`ApiError::Api`] with the message the
    /// server sent, or `fallback` when it sent none.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response_text = self.execute_raw(request, fallback).await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return its body text after checking the status.
    async fn execute_raw(&self, request: RequestBuilder, fallback: &str) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::from_response_body(status, &response_text, fallback));
        }

        Ok(response_text)
    }

    /// Drop the cached copy of a product.
    async fn forget_product(&self, id: ProductId) {
        self.inner.products.invalidate(&id).await;
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("cached_products", &self.inner.products.entry_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = ApiConfig::with_base_url("http://localhost:8080/api/v1").unwrap();
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_paths_under_base() {
        let api = client();
        assert_eq!(
            api.url("products/7", "").unwrap().as_str(),
            "http://localhost:8080/api/v1/products/7"
        );
        assert_eq!(
            api.url("orders/all", "pageNumber=1").unwrap().as_str(),
            "http://localhost:8080/api/v1/orders/all?pageNumber=1"
        );
    }

    #[test]
    fn test_debug_shows_base_url() {
        let debug = format!("{:?}", client());
        assert!(debug.contains("localhost:8080"));
    }
}
