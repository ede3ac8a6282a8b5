//! Application state shared by the front end's commands.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use crate::api::ApiClient;
use crate::cart::{CartView, ShoppingCart};
use crate::config::{ApiConfig, StorefrontConfig};
use crate::error::Result;
use crate::preferences::ThemePreference;
use crate::session::AuthSession;
use crate::storage::{FileStore, SharedStore};

/// Everything a command needs: the API client and the locally persisted
/// cart, login and theme.
///
/// Built once per run. The cart, session and theme all read from and write
/// to the same store.
pub struct AppState {
    api: ApiClient,
    store: SharedStore,
    cart: ShoppingCart,
    session: AuthSession,
    theme: ThemePreference,
}

impl AppState {
    /// Open the configured storage file and load the persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the storage
    /// file cannot be opened.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        let store: SharedStore = Arc::new(FileStore::open(config.storage_path.clone())?);
        info!(path = %config.storage_path.display(), "Opened local storage");
        Self::with_store(&config.api, store)
    }

    /// Load the persisted state from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(api: &ApiConfig, store: SharedStore) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(api)?,
            cart: ShoppingCart::load(Arc::clone(&store)),
            session: AuthSession::load(Arc::clone(&store)),
            theme: ThemePreference::load(Arc::clone(&store)),
            store,
        })
    }

    /// Get a reference to the store API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get a handle to the local store.
    #[must_use]
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub const fn cart(&self) -> &ShoppingCart {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut ShoppingCart {
        &mut self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut AuthSession {
        &mut self.session
    }

    #[must_use]
    pub const fn theme(&self) -> &ThemePreference {
        &self.theme
    }

    pub const fn theme_mut(&mut self) -> &mut ThemePreference {
        &mut self.theme
    }

    /// Bearer token of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error when nobody is logged in.
    pub fn token(&self) -> Result<SecretString> {
        Ok(self.session.require_token()?)
    }

    /// Resolve the cart's products for display.
    ///
    /// # Errors
    ///
    /// Returns an error when nobody is logged in; product lookups that fail
    /// are listed in [`CartView::unavailable`] instead.
    pub async fn cart_view(&self) -> Result<CartView> {
        if self.cart.is_empty() {
            return Ok(CartView::empty());
        }
        let token = self.token()?;
        Ok(CartView::resolve(&self.cart, &self.api, &token).await)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.api)
            .field("cart", &self.cart)
            .field("session", &self.session)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}
