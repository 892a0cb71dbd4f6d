//! HTTP transport behind a trait so the retry loop can run against a scripted
//! transport in tests.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("cryo-fasta/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Request(String),
}

/// One request/response exchange. Implementations do not retry.
pub trait Transport {
    /// GET `url` and return the body of a 2xx response
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Status` for non-2xx responses and
    /// `TransportError::Request` for connection, timeout or body failures.
    fn get(&self, url: &str) -> Result<String, TransportError>;

    /// POST `body` as JSON to `url` and return the body of a 2xx response
    ///
    /// # Errors
    ///
    /// As for [`Transport::get`].
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, TransportError>;
}

/// Blocking reqwest client with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Request` if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn read(response: reqwest::Result<reqwest::blocking::Response>) -> Result<String, TransportError> {
        let response = response.map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        response
            .text()
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        Self::read(self.client.get(url).send())
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, TransportError> {
        Self::read(self.client.post(url).json(body).send())
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        (**self).get(url)
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, TransportError> {
        (**self).post_json(url, body)
    }
}
