//! Errors returned by the REST client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when calling the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The call needs a bearer token and no user is logged in.
    #[error("Must be logged in")]
    NotLoggedIn,

    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of an API error, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Whether the token was missing, expired or lacked the needed role.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::NotLoggedIn)
            || matches!(
                self.status(),
                Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            )
    }

    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotLoggedIn => self.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Build an [`ApiError::Api`] from a failed response body.
    ///
    /// The API reports failures as JSON with a `message` field; when the body
    /// has none, `fallback` is used instead.
    #[must_use]
    pub fn from_response_body(status: StatusCode, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self::Api { status, message }
    }
}

/// Error payload sent by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
