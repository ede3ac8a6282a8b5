//! Order endpoints.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;
use volt_core::{OrderId, OrderStatus};

use super::query::{OrderSortKey, Pagination, order_query};
use super::types::{Order, OrderPage, OrderRequest, StatusRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected or the request fails.
    #[instrument(skip(self, token, request), fields(lines = request.order_items.len()))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        request: &OrderRequest,
    ) -> Result<Order, ApiError> {
        let url = self.url("orders", "")?;
        self.execute(
            self.authorized(Method::POST, url, token).json(request),
            "Failed to place order",
        )
        .await
    }

    /// Orders placed by the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_customer_orders(
        &self,
        token: &SecretString,
        pagination: &Pagination<OrderSortKey>,
    ) -> Result<OrderPage, ApiError> {
        let url = self.url("orders", &order_query(pagination))?;
        self.execute(
            self.authorized(Method::GET, url, token),
            "Failed to load orders",
        )
        .await
    }

    /// Every order in the store. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the token lacks the admin role or the request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_all_orders(
        &self,
        token: &SecretString,
        pagination: &Pagination<OrderSortKey>,
    ) -> Result<OrderPage, ApiError> {
        let url = self.url("orders/all", &order_query(pagination))?;
        self.execute(
            self.authorized(Method::GET, url, token),
            "Failed to load orders",
        )
        .await
    }

    /// Approve or decline an order. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the token lacks the admin role or the request fails.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &SecretString,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let url = self.url(&format!("orders/{order_id}"), "")?;
        let body = StatusRequest { order_id, status };
        self.execute(
            self.authorized(Method::PUT, url, token).json(&body),
            "Failed to update order status",
        )
        .await
    }
}
