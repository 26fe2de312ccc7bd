//! Session store — the single in-process owner of authentication state.
//!
//! ARCHITECTURE
//! ============
//! State lives behind a `tokio::sync::RwLock` and is never held across a
//! network await. Each operation takes the lock to start, releases it for
//! the HTTP call, and takes it again to apply the result.
//!
//! States: Anonymous -> Authenticating -> Authenticated, with `loading`
//! covering the Authenticating gap. Credentials (user + token) are a single
//! `Option`, so "authenticated" is exactly "credentials present".
//!
//! SEQUENCING
//! ==========
//! Every signup/login/logout bumps `generation`. A signup/login result is
//! applied only if the generation it captured is still current; a stale
//! result is dropped without touching state or emitting a notice. This
//! replaces "last response wins" with "last request wins". A profile 401
//! logs out only if the generation is unchanged since the fetch began.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::api::{ApiError, AuthApi, bearer};
use crate::notify::{Notice, Notify};
use crate::storage::SessionStorage;
use crate::types::{AuthResponse, Credentials, LoginRequest, PersistedSession, Session, SignupRequest, User};

const SIGNUP_OK: &str = "Account created successfully!";
const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
const LOGIN_OK: &str = "Logged in successfully!";
const LOGIN_FAILED: &str = "Login failed. Please try again.";
const LOGOUT_OK: &str = "Logged out successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthAction {
    Signup,
    Login,
}

impl AuthAction {
    fn success_message(self) -> &'static str {
        match self {
            Self::Signup => SIGNUP_OK,
            Self::Login => LOGIN_OK,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Signup => SIGNUP_FAILED,
            Self::Login => LOGIN_FAILED,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Login => "login",
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    credentials: Option<Credentials>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Inner {
    fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }
}

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn SessionStorage>,
    notifier: Arc<dyn Notify>,
    inner: RwLock<Inner>,
}

impl SessionStore {
    /// Empty, anonymous store. Nothing is read from storage.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn SessionStorage>, notifier: Arc<dyn Notify>) -> Self {
        Self { api, storage, notifier, inner: RwLock::new(Inner::default()) }
    }

    /// Store restored from `storage`.
    ///
    /// The persisted token is in place before this returns, so every later
    /// call carries it. An unreadable or self-inconsistent record is logged
    /// and the store starts anonymous.
    #[must_use]
    pub fn rehydrate(api: Arc<dyn AuthApi>, storage: Arc<dyn SessionStorage>, notifier: Arc<dyn Notify>) -> Self {
        let credentials = match storage.load() {
            Ok(Some(record)) => record.into_credentials().unwrap_or_else(|()| {
                tracing::warn!("persisted session is inconsistent; starting anonymous");
                None
            }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted session; starting anonymous");
                None
            }
        };
        if let Some(c) = &credentials {
            tracing::debug!(user_id = c.user.id, "session rehydrated");
        }

        let inner = Inner { credentials, ..Inner::default() };
        Self { api, storage, notifier, inner: RwLock::new(inner) }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Create an account and sign in. Returns `true` if this call's result
    /// became the current session.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> bool {
        let request = SignupRequest { email: email.to_owned(), password: password.to_owned(), name: name.to_owned() };
        let generation = self.begin().await;
        let result = self.api.signup(&request).await;
        self.finish(AuthAction::Signup, generation, result).await
    }

    /// Sign in. Returns `true` if this call's result became the current
    /// session.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        let generation = self.begin().await;
        let result = self.api.login(&request).await;
        self.finish(AuthAction::Login, generation, result).await
    }

    /// Clear the local session, then tell the server on a best-effort basis.
    ///
    /// Local state is cleared before the remote call so a slow or failing
    /// server can never leave the session behind.
    pub async fn logout(&self) {
        let token = self.sign_out(&mut self.inner.write().await);
        self.finish_logout(token).await;
    }

    /// Refresh the stored user from `/auth/profile`.
    ///
    /// Does nothing when anonymous. A 401 means the token is dead and logs
    /// the session out, unless a signup, login or logout started while the
    /// fetch was in flight; other failures are logged and leave state alone.
    pub async fn get_profile(&self) {
        let (token, generation) = {
            let inner = self.inner.read().await;
            let Some(token) = inner.token() else {
                return;
            };
            (token.to_owned(), inner.generation)
        };

        match self.api.profile(&token).await {
            Ok(user) => {
                let mut inner = self.inner.write().await;
                match inner.credentials.as_mut() {
                    Some(c) if c.token == token => {
                        c.user = user;
                        self.persist(&inner);
                    }
                    _ => tracing::debug!("session changed during profile fetch; discarding profile"),
                }
            }
            Err(e) if e.is_unauthorized() => {
                let mut inner = self.inner.write().await;
                if inner.generation != generation || inner.token() != Some(token.as_str()) {
                    tracing::debug!(
                        generation,
                        current = inner.generation,
                        "session changed during profile fetch; ignoring 401"
                    );
                    return;
                }
                tracing::warn!(error = %e, "profile fetch rejected credential; logging out");
                let token = self.sign_out(&mut inner);
                drop(inner);
                self.finish_logout(token).await;
            }
            Err(e) => tracing::warn!(error = %e, "failed to get profile"),
        }
    }

    pub async fn clear_error(&self) {
        self.inner.write().await.error = None;
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub async fn snapshot(&self) -> Session {
        let inner = self.inner.read().await;
        Session {
            user: inner.credentials.as_ref().map(|c| c.user.clone()),
            token: inner.credentials.as_ref().map(|c| c.token.clone()),
            loading: inner.loading,
            error: inner.error.clone(),
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.credentials.is_some()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.credentials.as_ref().map(|c| c.user.clone())
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token().map(str::to_owned)
    }

    /// `Authorization` header value attached to credentialed calls.
    pub async fn authorization(&self) -> Option<String> {
        self.inner.read().await.token().map(bearer)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Local half of logout. Returns the token that was held.
    fn sign_out(&self, inner: &mut RwLockWriteGuard<'_, Inner>) -> Option<String> {
        let token = inner.credentials.take().map(|c| c.token);
        inner.error = None;
        inner.loading = false;
        inner.generation += 1;
        self.persist(inner);
        token
    }

    async fn finish_logout(&self, token: Option<String>) {
        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "logout notification failed");
            }
        }

        self.notifier.notify(Notice::Success(LOGOUT_OK.to_owned()));
    }

    async fn begin(&self) -> u64 {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.loading = true;
        inner.error = None;
        inner.generation
    }

    async fn finish(&self, action: AuthAction, generation: u64, result: Result<AuthResponse, ApiError>) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            tracing::debug!(
                action = action.name(),
                generation,
                current = inner.generation,
                "discarding superseded auth response"
            );
            return false;
        }

        inner.loading = false;
        let notice = match result {
            Ok(resp) => {
                tracing::info!(action = action.name(), user_id = resp.user.id, "authenticated");
                inner.credentials = Some(Credentials { user: resp.user, token: resp.access_token });
                inner.error = None;
                Notice::Success(action.success_message().to_owned())
            }
            Err(e) => {
                tracing::warn!(action = action.name(), error = %e, "authentication failed");
                let message = e.user_message(action.fallback_message());
                inner.credentials = None;
                inner.error = Some(message.clone());
                Notice::Error(message)
            }
        };
        self.persist(&inner);
        drop(inner);

        let ok = !notice.is_error();
        self.notifier.notify(notice);
        ok
    }

    /// Write the persisted subset. Called with the write guard held so
    /// records land in transition order.
    fn persist(&self, inner: &RwLockWriteGuard<'_, Inner>) {
        let record = PersistedSession::from_credentials(inner.credentials.as_ref());
        if let Err(e) = self.storage.save(&record) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
