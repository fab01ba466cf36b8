//! HTTP transport and request header collaborators

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Result, UpdateError};

/// GitHub rejects requests without a user agent
const DEFAULT_USER_AGENT: &str = concat!("update-state/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a completed GET request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Fail with `Network` unless the status is 2xx
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(UpdateError::Network(format!(
                "Request failed with status: {}",
                self.status
            )))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Issues GET requests on behalf of the pollers
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, mut headers: HeaderMap) -> Result<HttpResponse> {
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        }

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| UpdateError::Network(format!("Failed to fetch {url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::Network(format!("Failed to read body of {url}: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}

/// Produces the headers for authenticated requests
pub trait HeaderSource: Send + Sync {
    fn headers(&self) -> Result<HeaderMap>;
}

/// Sends `Authorization: Bearer <token>`, or nothing when the token is empty
#[derive(Debug, Clone, Default)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl HeaderSource for BearerToken {
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let token = self.0.trim();
        if token.is_empty() {
            return Ok(headers);
        }

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| UpdateError::Network(format!("Invalid token format: {e}")))?,
        );
        Ok(headers)
    }
}
