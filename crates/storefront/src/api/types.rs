//! Request and response types of the store REST API.
//!
//! Field names follow the API's camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};
use volt_core::{OrderId, OrderStatus, Price, ProductId, RatingId, RoleId, UserId};

// =============================================================================
// Pagination
// =============================================================================

/// Pagination metadata shared by every paged response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub total_items: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub is_first: bool,
    pub is_last: bool,
}

impl Page {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        !self.is_last && self.page_number + 1 < self.total_pages
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u32> {
        if self.has_next() {
            Some(self.page_number + 1)
        } else {
            None
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub memory: String,
    #[serde(default)]
    pub screen_size: String,
    #[serde(default)]
    pub battery_capacity: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub color: String,
    /// Mean rating, sent either as a number or a numeric string.
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub category: String,
}

/// Body of product create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub price: Price,
    pub brand: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub memory: String,
    pub screen_size: String,
    pub battery_capacity: String,
    pub operating_system: String,
    pub color: String,
}

impl From<&Product> for ProductRequest {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            brand: product.brand.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            memory: product.memory.clone(),
            screen_size: product.screen_size.clone(),
            battery_capacity: product.battery_capacity.clone(),
            operating_system: product.operating_system.clone(),
            color: product.color.clone(),
        }
    }
}

/// A page of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(flatten)]
    pub page: Page,
    pub products: Vec<Product>,
}

/// Values available for each product filter, given the current selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilterOption {
    pub brands: Vec<String>,
    pub prices: Vec<Price>,
    pub colors: Vec<String>,
    pub memories: Vec<String>,
    pub screen_sizes: Vec<String>,
    pub battery_capacities: Vec<String>,
    pub operating_systems: Vec<String>,
    pub categories: Vec<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// One product line of an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of the order creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_items: Vec<OrderLine>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub payment_information: String,
}

/// One priced line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub product: Product,
    pub quantity: u32,
    pub sub_total: Price,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: User,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub total_price: Price,
    pub items: Vec<OrderItem>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub payment_information: String,
    pub status: OrderStatus,
}

/// A page of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    #[serde(flatten)]
    pub page: Page,
    pub orders: Vec<Order>,
}

/// Body of the order status update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

// =============================================================================
// Ratings
// =============================================================================

/// A user's rating of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub rating: f64,
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Body of rating create and update calls. The API takes the score as a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub product_id: ProductId,
    pub rating: String,
}

// =============================================================================
// Users & auth
// =============================================================================

/// Role granted to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub role_name: String,
}

/// An account as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub user_image: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    /// Role name that grants access to the admin panel.
    pub const ADMIN_ROLE: &'static str = "ROLE_ADMIN";

    /// Whether the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role.role_name == Self::ADMIN_ROLE)
    }
}

/// Body of the registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
}

/// Body of the login call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of the login call.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub jwt: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("jwt", &"[REDACTED]")
            .finish()
    }
}

/// Body of the password change call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Body of the profile update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDataRequest {
    pub old_username: String,
    pub new_username: String,
    pub email: String,
    pub user_image: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Accept `4.5`, `"4.5"` or `null`.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
