//! Typed access to the booking backend's REST API.
//!
//! Every call goes through [`ApiClient`], which resolves paths against the
//! configured base, attaches the bearer token and maps non-2xx responses to
//! [`AppError`].

pub mod bookings;
pub mod catalog;
pub mod payments;
pub mod schedule;

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::errors::{AppError, AppResult};

pub use catalog::FacilityQuery;

/// Resolves `path` against `base`, joined by exactly one slash.
/// Absolute URLs pass through untouched.
pub fn endpoint(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Dates travel to the search and booking endpoints as `MM/DD/YYYY`.
pub fn backend_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> AppResult<T> {
        let text = Self::send_text(req).await?;
        serde_json::from_str(&text).map_err(|e| AppError::InvalidResponse(e.to_string()))
    }

    async fn send_text(req: RequestBuilder) -> AppResult<String> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "api request failed");
            return Err(AppError::from_response(status, &text));
        }
        Ok(text)
    }

    async fn send_empty(req: RequestBuilder) -> AppResult<()> {
        Self::send_text(req).await.map(|_| ())
    }
}
