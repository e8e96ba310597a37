use std::fmt::Debug;

use log::{debug, warn};
use reqwest::{blocking::Client, header::CONTENT_TYPE};

use crate::error::{ClientError, TransportError};

pub const DEFAULT_BASE_URL: &str = "https://api.ipgeolocation.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Geolocation,
    Timezone,
}

impl Endpoint {
    /// Path segment under the service host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Geolocation => "ipgeo",
            Endpoint::Timezone => "timezone",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status line and body of one exchange.
///
/// `body` is `None` when the body could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Option<String>,
}

pub trait Transport: Send + Sync + Debug {
    /// Performs one blocking GET for `endpoint` with the prepared `query`.
    fn get(&self, endpoint: Endpoint, query: &str) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] over a blocking reqwest client.
///
/// Idle connections are never kept, so every call opens a fresh one and
/// closes it when the response is dropped.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the transport at another host, e.g. a proxy or a test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self::with_client(base_url, http))
    }

    /// Uses a caller-configured client (timeouts, proxies, TLS roots).
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint, query: &str) -> String {
        format!("{}/{}?{}", self.base_url, endpoint, query)
    }
}

impl Transport for HttpTransport {
    fn get(&self, endpoint: Endpoint, query: &str) -> Result<RawResponse, TransportError> {
        let url = self.url(endpoint, query);
        let redacted = redact_api_key(&url);
        debug!("GET {redacted}");

        let res = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(|source| TransportError { url: redacted.clone(), source: source.without_url() })?;

        let status = res.status().as_u16();
        let body = match res.text() {
            Ok(body) => Some(body),
            Err(err) => {
                warn!("Failed to read {endpoint} response body (status {status}): {err}");
                None
            }
        };

        Ok(RawResponse { status, body })
    }
}

/// Replaces the `apiKey` value so URLs can be logged.
pub(crate) fn redact_api_key(url: &str) -> String {
    let Some(start) = url.find("apiKey=").map(|i| i + "apiKey=".len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);
    format!("{}***{}", &url[..start], &url[end..])
}
