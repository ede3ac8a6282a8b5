//! Unified error handling.
//!
//! Provides a unified `AppError` type for front ends built on this crate.
//! Every operation error converts into it with `?`.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::{PersistenceError, StorageError};
use crate::validation::ValidationErrors;

/// Fallback message for failures the user cannot act on.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A bound value could not be saved.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Store API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Order could not be placed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Form input was rejected.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Bad command-line or form argument.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Wrap an API error from a lookup of `what`, turning a 404 into
    /// [`AppError::NotFound`].
    #[must_use]
    pub fn from_lookup(err: ApiError, what: impl std::fmt::Display) -> Self {
        if err.is_not_found() {
            Self::NotFound(format!("{what} not found"))
        } else {
            Self::Api(err)
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Storage and persistence failures map to a generic message. Configuration
    /// errors are shown in full since they name the variable to fix.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) | Self::Checkout(CheckoutError::Api(err)) => err.user_message(),
            Self::Checkout(err) => err.to_string(),
            Self::Cart(err @ CartError::QuantityLimit { .. }) => err.to_string(),
            Self::Validation(err) => err.to_string(),
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Config(err) => err.to_string(),
            Self::Storage(_) | Self::Persistence(_) | Self::Cart(CartError::Persistence(_)) => {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
