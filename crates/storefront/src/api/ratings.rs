//! Rating endpoints.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;
use volt_core::ProductId;

use super::types::{Rating, RatingRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Rate a product for the first time.
    ///
    /// # Errors
    ///
    /// Returns an error if the user already rated it or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn post_rating(
        &self,
        token: &SecretString,
        product_id: ProductId,
        rating: u8,
    ) -> Result<Rating, ApiError> {
        self.send_rating(Method::POST, token, product_id, rating).await
    }

    /// Change the user's existing rating of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the user has no rating to change or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn update_rating(
        &self,
        token: &SecretString,
        product_id: ProductId,
        rating: u8,
    ) -> Result<Rating, ApiError> {
        self.send_rating(Method::PUT, token, product_id, rating).await
    }

    /// The user's rating of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the user has not rated it or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn fetch_rating(
        &self,
        token: &SecretString,
        product_id: ProductId,
    ) -> Result<Rating, ApiError> {
        let url = self.url(&format!("products/{product_id}/ratings"), "")?;
        self.execute(
            self.authorized(Method::GET, url, token),
            "Failed to load rating",
        )
        .await
    }

    async fn send_rating(
        &self,
        method: Method,
        token: &SecretString,
        product_id: ProductId,
        rating: u8,
    ) -> Result<Rating, ApiError> {
        let url = self.url(&format!("products/{product_id}/ratings"), "")?;
        let body = RatingRequest {
            product_id,
            rating: rating.to_string(),
        };

        let saved = self
            .execute(
                self.authorized(method, url, token).json(&body),
                "Failed to save rating",
            )
            .await?;

        // The product's average rating changed.
        self.forget_product(product_id).await;
        Ok(saved)
    }
}
