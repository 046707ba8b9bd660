//! Request gateway: the single place HTTP requests are built and decoded
//!
//! Every Finport call goes through [`Gateway::send`] or
//! [`Gateway::upload_multipart`], which attach the bearer token, enforce the
//! client-side rate limit and map failures onto [`ApiError`].

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, Method, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::multipart::MultipartForm;
use crate::auth::{RefreshRequest, TokenPair, TokenRefresher};
use crate::error::{ApiError, Result};

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client-side cap on outgoing requests
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Authenticated request gateway
pub struct Gateway {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl Gateway {
    /// Create a gateway for the given API host, e.g. `https://api.example.com`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::from)?;

        let quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a JSON request and decode the JSON response.
    ///
    /// `Content-Type: application/json` is always set; the bearer header only
    /// when a token is given.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<T> {
        let mut request = self
            .request(method, path, token)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    /// POST a multipart/form-data body and decode the JSON response.
    pub async fn upload_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &MultipartForm,
        token: Option<&str>,
    ) -> Result<T> {
        let request = self
            .request(Method::POST, path, token)
            .header(header::CONTENT_TYPE, form.content_type())
            .body(form.encode());
        self.execute(request).await
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let request = self
            .http
            .request(method, &url)
            .header(header::ACCEPT, "application/json");
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            debug!("Request failed with status {}", status);
            return Err(ApiError::Status {
                code: status.as_u16(),
                message: error_message(&text, status),
            }
            .into());
        }

        decode_body(&text)
    }
}

#[async_trait]
impl TokenRefresher for Gateway {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let body = serde_json::to_value(RefreshRequest { refresh_token })?;
        self.send(Method::POST, REFRESH_PATH, Some(&body), None).await
    }
}

/// Decode a success body. An empty body decodes as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T> {
    let raw = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(raw).map_err(|e| ApiError::Decoding(e.to_string()).into())
}

/// Human-readable message for an error response. Prefers a JSON `detail` or
/// `message` field and truncates anything else.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();
    }

    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}
