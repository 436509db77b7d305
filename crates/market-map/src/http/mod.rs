//! HTTP transport used by REST fetchers.
//!
//! Fetchers talk to the network only through [`RequestHandler`], so tests
//! and alternative transports can be swapped in without touching parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::{FetchError, MarketMapError};

/// Status code and raw body of a GET request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes unauthenticated GET requests.
///
/// Transport failures are reported as `UpstreamGeneral`; non-200 statuses are
/// returned as responses and judged by the caller.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// [`RequestHandler`] backed by a pooled `reqwest` client.
pub struct ReqwestRequestHandler {
    client: Client,
}

impl ReqwestRequestHandler {
    /// Build a handler whose requests time out after `timeout` and which keeps
    /// at most `max_idle_per_host` pooled connections per host.
    pub fn new(timeout: Duration, max_idle_per_host: usize) -> Result<Self, MarketMapError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(max_idle_per_host)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestHandler for ReqwestRequestHandler {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::upstream(format!("request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::upstream(format!("reading body from {url} failed: {e}")))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
