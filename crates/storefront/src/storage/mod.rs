//! Local key-value persistence.
//!
//! The storefront keeps a handful of values between runs: the cart, the
//! theme preference and the auth token. They live in a string-keyed,
//! string-valued store with the same three primitives a browser's local
//! storage offers.
//!
//! # Stores
//!
//! - [`MemoryStore`] - process-local, optionally with a byte quota
//! - [`FileStore`] - a single JSON object on disk, rewritten atomically
//!
//! Typed values are bound to a key through [`PersistentValue`].

mod binding;
mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use binding::{PersistenceError, PersistentValue, load_json, save_json};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store contents could not be encoded for writing.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing the value would exceed the store's quota.
    #[error("storage quota of {limit} bytes exceeded while writing '{key}'")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Configured quota in bytes.
        limit: usize,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String-keyed persistent store.
///
/// Implementations are shared between the cart, preferences and auth
/// session, so every method takes `&self` and handles its own locking.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored at `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` at `key`, replacing any prior content.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value at `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Keys used by the storefront.
pub mod keys {
    /// Cart entries, a JSON array of `{"id", "quantity"}` objects.
    pub const SHOPPING_CART: &str = "shopping-cart";

    /// Theme preference, the raw string `dark` or `light`.
    pub const THEME: &str = "theme";

    /// Bearer token of the logged-in user, stored raw.
    pub const TOKEN: &str = "token";
}
