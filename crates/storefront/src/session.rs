//! Login state.
//!
//! The bearer token lives in the local store under `token` as a bare string,
//! so a login survives restarts until [`AuthSession::logout`].

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::storage::{SharedStore, StorageError, keys};

/// The logged-in user's bearer token, if any.
#[derive(Clone)]
pub struct AuthSession {
    store: SharedStore,
    token: Option<SecretString>,
}

impl AuthSession {
    /// Read the stored token. Empty or unreadable values mean logged out.
    #[must_use]
    pub fn load(store: SharedStore) -> Self {
        let token = match store.get_item(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };
        Self { store, token }
    }

    /// Store `token` and mark the session logged in.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails; the session is logged in
    /// for this run either way.
    pub fn login(&mut self, token: SecretString) -> Result<(), StorageError> {
        let result = self.store.set_item(keys::TOKEN, token.expose_secret());
        self.token = Some(token);
        info!("Logged in");
        result
    }

    /// Forget the token.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the stored token cannot be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.token = None;
        info!("Logged out");
        self.store.remove_item(keys::TOKEN)
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.token.clone()
    }

    /// The bearer token of an authenticated call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotLoggedIn`] when there is no token.
    pub fn require_token(&self) -> Result<SecretString, ApiError> {
        self.token().ok_or(ApiError::NotLoggedIn)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn test_logged_out_without_token() {
        let session = AuthSession::load(Arc::new(MemoryStore::new()));
        assert!(!session.is_logged_in());
        assert!(matches!(session.require_token(), Err(ApiError::NotLoggedIn)));
    }

    #[test]
    fn test_empty_token_is_logged_out() {
        let store = Arc::new(MemoryStore::with_items([(keys::TOKEN, "")]));
        assert!(!AuthSession::load(store).is_logged_in());
    }

    #[test]
    fn test_login_persists_raw_token() {
        let store = Arc::new(MemoryStore::new());
        let mut session = AuthSession::load(store.clone());
        session.login(SecretString::from("abc.def.ghi")).unwrap();

        assert!(session.is_logged_in());
        assert_eq!(store.get_item(keys::TOKEN).unwrap().as_deref(), Some("abc.def.ghi"));
        assert_eq!(session.require_token().unwrap().expose_secret(), "abc.def.ghi");

        let reloaded = AuthSession::load(store);
        assert!(reloaded.is_logged_in());
    }

    #[test]
    fn test_logout_removes_token() {
        let store = Arc::new(MemoryStore::with_items([(keys::TOKEN, "abc")]));
        let mut session = AuthSession::load(store.clone());
        session.logout().unwrap();

        assert!(!session.is_logged_in());
        assert_eq!(store.get_item(keys::TOKEN).unwrap(), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = Arc::new(MemoryStore::with_items([(keys::TOKEN, "super-secret-jwt")]));
        let debug = format!("{:?}", AuthSession::load(store));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-jwt"));
    }
}
