//! Turning the cart into an order.

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::types::{Order, OrderRequest};
use crate::api::{ApiClient, ApiError};
use crate::cart::ShoppingCart;
use crate::validation::{ValidationErrors, validate_checkout};

/// Shown when card payment is chosen.
pub const CREDIT_CARD_UNAVAILABLE: &str = "Credit Card payment is not available at the moment. We apologize for the inconvenience. Please try again later.";

/// Errors that stop an order from being placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("{}", CREDIT_CARD_UNAVAILABLE)]
    PaymentUnavailable,

    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How the order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    CreditCard,
}

impl PaymentMethod {
    /// Value sent as `paymentInformation`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "creditCard",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cash" => Ok(Self::Cash),
            "creditcard" | "card" => Ok(Self::CreditCard),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Shipping and payment details entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutForm {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub payment: PaymentMethod,
}

/// Build the order for the cart's current contents.
///
/// # Errors
///
/// Returns [`CheckoutError`] if the cart is empty, card payment was chosen
/// or the form is invalid.
pub fn build_order_request(
    cart: &ShoppingCart,
    form: &CheckoutForm,
) -> Result<OrderRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if form.payment == PaymentMethod::CreditCard {
        return Err(CheckoutError::PaymentUnavailable);
    }
    validate_checkout(form)?;

    Ok(OrderRequest {
        order_items: cart.order_lines(),
        address: form.address.trim().to_string(),
        city: form.city.trim().to_string(),
        postal_code: form.postal_code.trim().to_string(),
        phone_number: form.phone_number.trim().to_string(),
        payment_information: form.payment.as_str().to_string(),
    })
}

/// Place an order for everything in the cart, then empty the cart.
///
/// The cart is left untouched if the order is not placed. Once the API has
/// accepted the order, a failure to save the emptied cart is logged but not
/// returned.
///
/// # Errors
///
/// Returns [`CheckoutError`] if the order cannot be built or the API
/// rejects it.
#[instrument(skip_all, fields(lines = cart.entries().len()))]
pub async fn submit_order(
    cart: &mut ShoppingCart,
    api: &ApiClient,
    token: &SecretString,
    form: &CheckoutForm,
) -> Result<Order, CheckoutError> {
    let request = build_order_request(cart, form)?;
    let order = api.create_order(token, &request).await?;

    info!(order_id = %order.id, total = %order.total_price, "Order placed");

    if let Err(e) = cart.clear() {
        warn!(error = %e, "Order placed but the emptied cart could not be saved");
    }
    Ok(order)
}
