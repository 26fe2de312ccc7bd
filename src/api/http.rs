//! `reqwest` implementation of [`AuthApi`].
//!
//! Thin HTTP wrapper over `/auth/*`. Body parsing lives in free functions
//! (`parse_json`, `parse_detail`) so it can be tested without a server.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use super::{ApiError, AuthApi, bearer};
use crate::config::{Config, Timeouts};
use crate::types::{AuthResponse, LoginRequest, SignupRequest, User};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend or client
    /// cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// # Errors
    ///
    /// See [`HttpAuthApi::new`].
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn expect<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        expected: StatusCode,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;

        if status != expected {
            return Err(ApiError::Status { status: status.as_u16(), detail: parse_detail(&text) });
        }

        parse_json(&text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let req = self.http.post(self.url("/auth/signup")).json(request);
        self.expect(req, StatusCode::CREATED).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let req = self.http.post(self.url("/auth/login")).json(request);
        self.expect(req, StatusCode::OK).await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status: status.as_u16(), detail: parse_detail(&text) })
    }

    async fn profile(&self, token: &str) -> Result<User, ApiError> {
        let req = self.http.get(self.url("/auth/profile")).header(AUTHORIZATION, bearer(token));
        self.expect(req, StatusCode::OK).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}` and the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`. Anything else yields `None`.
fn parse_detail(text: &str) -> Option<String> {
    let body: serde_json::Value = serde_json::from_str(text).ok()?;
    match body.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .filter(|m| !m.is_empty())
                .collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
