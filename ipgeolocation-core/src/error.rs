use thiserror::Error;

/// Errors raised while constructing a client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// A request that never produced an HTTP status line.
///
/// DNS failures, refused connections, timeouts and malformed URLs all end up
/// here. A non-2xx response is not a transport error.
#[derive(Debug, Error)]
#[error("Request to {url} failed: {source}")]
pub struct TransportError {
    /// Request URL with the API key redacted.
    pub url: String,
    #[source]
    pub source: reqwest::Error,
}
