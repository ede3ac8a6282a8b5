//! Product and filter endpoints.

use reqwest::Method;
use secrecy::SecretString;
use tracing::{debug, instrument};
use volt_core::ProductId;

use super::query::{
    Pagination, ProductFilter, ProductSortKey, SortDirection, filter_query, product_query,
};
use super::types::{Product, ProductFilterOption, ProductPage, ProductRequest};
use super::{ApiClient, ApiError};

/// Size of the top-rated product strip.
const TOP_RATED_COUNT: u32 = 8;

impl ApiClient {
    /// List products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_products(
        &self,
        token: &SecretString,
        pagination: &Pagination<ProductSortKey>,
        filter: &ProductFilter,
    ) -> Result<ProductPage, ApiError> {
        let url = self.url("products", &product_query(pagination, filter))?;
        self.execute(
            self.authorized(Method::GET, url, token),
            "Failed to load products",
        )
        .await
    }

    /// The best-rated products. Needs no login.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fetch_top_rated(&self) -> Result<ProductPage, ApiError> {
        let pagination = Pagination::default()
            .size(TOP_RATED_COUNT)
            .sorted(ProductSortKey::Ratings, SortDirection::Desc);
        let url = self.url("products", &product_query(&pagination, &ProductFilter::default()))?;
        self.execute(self.request(Method::GET, url), "Failed to load products")
            .await
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn fetch_product(&self, token: &SecretString, id: ProductId) -> Result<Product, ApiError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.url(&format!("products/{id}"), "")?;
        let product: Product = self
            .execute(self.authorized(Method::GET, url, token), "Product not found")
            .await?;

        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }

    /// Create a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the token lacks the admin role or the request fails.
    #[instrument(skip(self, token, request), fields(name = %request.name))]
    pub async fn add_product(
        &self,
        token: &SecretString,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        let url = self.url("products", "")?;
        self.execute(
            self.authorized(Method::POST, url, token).json(request),
            "Failed to add product",
        )
        .await
    }

    /// Replace a product's details. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the token lacks the admin role or the request fails.
    #[instrument(skip(self, token, request), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: ProductId,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        let url = self.url(&format!("products/{id}"), "")?;
        let product: Product = self
            .execute(
                self.authorized(Method::PUT, url, token).json(request),
                "Failed to update product",
            )
            .await?;

        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }

    /// Delete a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the token lacks the admin role or the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &SecretString, id: ProductId) -> Result<Product, ApiError> {
        let url = self.url(&format!("products/{id}"), "")?;
        let product = self
            .execute(
                self.authorized(Method::DELETE, url, token),
                "Failed to delete product",
            )
            .await?;

        self.forget_product(id).await;
        Ok(product)
    }

    /// Values still selectable in each filter, given the current selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_filter_options(
        &self,
        token: &SecretString,
        filter: &ProductFilter,
    ) -> Result<ProductFilterOption, ApiError> {
        let url = self.url("filter/products", &filter_query(filter))?;
        self.execute(
            self.authorized(Method::GET, url, token),
            "Failed to load filters",
        )
        .await
    }
}
