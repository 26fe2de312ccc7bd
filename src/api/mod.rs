//! Auth API seam — the trait the store calls and its error type.
//!
//! DESIGN
//! ======
//! No process-wide default headers. Every call that needs a credential takes
//! the token as an argument, so the only holder of the token is the store.

pub mod http;

pub use http::HttpAuthApi;

use crate::types::{AuthResponse, LoginRequest, SignupRequest, User};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by auth API calls.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure: connect, timeout, TLS, body read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a status other than the expected one.
    #[error("server returned status {status}")]
    Status { status: u16, detail: Option<String> },

    /// The success body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// The server rejected the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Server-supplied detail message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail: Some(detail), .. } => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Message suitable for showing to the user: the server detail when
    /// present, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_owned()
    }
}

/// `Authorization` header value for a bearer token.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// =============================================================================
// TRAIT
// =============================================================================

/// Remote auth endpoints consumed by the session store.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/signup`; succeeds only on 201.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, any other status, or a
    /// malformed body.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/login`; succeeds only on 200.
    ///
    /// # Errors
    ///
    /// Same as [`AuthApi::signup`].
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/logout` with the given bearer token; any 2xx succeeds.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx status.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// `GET /auth/profile` with the given bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]; a 401 is reported as a `Status` error for
    /// which [`ApiError::is_unauthorized`] is true.
    async fn profile(&self, token: &str) -> Result<User, ApiError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
