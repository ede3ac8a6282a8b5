//! Account endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::types::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest, UpdateUserDataRequest,
    User,
};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email is taken, or the request fails.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let url = self.url("auth/register", "")?;
        self.execute(self.request(Method::POST, url).json(request), "Registration failed")
            .await
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<SecretString, ApiError> {
        let url = self.url("auth/login", "")?;
        let body = LoginRequest {
            username: username.to_string(),
            password: password.expose_secret().to_string(),
        };

        let response: LoginResponse = self
            .execute(self.request(Method::POST, url).json(&body), "Login failed")
            .await?;

        Ok(SecretString::from(response.jwt))
    }

    /// Get the account the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn current_user(&self, token: &SecretString) -> Result<User, ApiError> {
        let url = self.url("auth/current-user", "")?;
        self.execute(
            self.authorized(Method::GET, url, token),
            "Failed to load account",
        )
        .await
    }

    /// Change username, email or avatar.
    ///
    /// # Errors
    ///
    /// Returns an error if the new username is taken or the request fails.
    #[instrument(skip(self, token, request), fields(username = %request.old_username))]
    pub async fn update_user(
        &self,
        token: &SecretString,
        request: &UpdateUserDataRequest,
    ) -> Result<User, ApiError> {
        let url = self.url("auth/update-data", "")?;
        self.execute(
            self.authorized(Method::PUT, url, token).json(request),
            "Failed to update account",
        )
        .await
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns an error if the old password is wrong or the request fails.
    #[instrument(skip(self, token, request), fields(username = %request.username))]
    pub async fn change_password(
        &self,
        token: &SecretString,
        request: &ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        let url = self.url("auth/update-password", "")?;
        self.execute_raw(
            self.authorized(Method::PUT, url, token).json(request),
            "Failed to change password",
        )
        .await?;
        Ok(())
    }
}
