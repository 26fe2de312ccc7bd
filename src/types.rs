//! Wire and state types shared by the store, the API client and storage.
//!
//! DESIGN
//! ======
//! The server speaks snake_case JSON; the persisted record keeps the
//! `isAuthenticated` key of the browser-era storage format so existing
//! records load unchanged.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// USER
// =============================================================================

/// Account returned by `/auth/login`, `/auth/signup` and `/auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub organization_ids: BTreeSet<i64>,
    #[serde(default)]
    pub role: String,
    /// Server timestamp, kept verbatim.
    #[serde(default)]
    pub created_at: String,
}

// =============================================================================
// REQUESTS / RESPONSES
// =============================================================================

#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Body of a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds as reported by the server; informational.
    #[serde(default)]
    pub expires_in: u64,
    pub user: User,
}

// =============================================================================
// SESSION
// =============================================================================

/// A user together with the bearer token issued for them.
///
/// Keeping both in one value makes "token without user" unrepresentable.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: User,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Point-in-time copy of the store's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

// =============================================================================
// PERSISTED SUBSET
// =============================================================================

/// The part of the session that survives a restart. `loading` and `error`
/// are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(rename = "isAuthenticated", default)]
    pub is_authenticated: bool,
}

impl PersistedSession {
    #[must_use]
    pub fn from_credentials(credentials: Option<&Credentials>) -> Self {
        match credentials {
            Some(c) => Self { user: Some(c.user.clone()), token: Some(c.token.clone()), is_authenticated: true },
            None => Self::default(),
        }
    }

    /// Credentials carried by this record, if the record is self-consistent.
    ///
    /// Returns `Err(())` for a record whose fields disagree (for example a
    /// token with no user); `Ok(None)` for a consistent anonymous record.
    #[allow(clippy::result_unit_err)]
    pub fn into_credentials(self) -> Result<Option<Credentials>, ()> {
        match (self.user, self.token, self.is_authenticated) {
            (Some(user), Some(token), true) if !token.is_empty() => Ok(Some(Credentials { user, token })),
            (None, None, false) => Ok(None),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
