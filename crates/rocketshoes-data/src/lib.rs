//! HTTP client utilities for RocketShoes.
//!
//! Provides a small async API over `reqwest` for reading JSON resources
//! relative to a base URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_data::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Stock {
//!     amount: u32,
//! }
//!
//! let client = FetchClient::new().with_base_url("http://localhost:3333");
//!
//! let stock: Stock = client.get("stock/1").send().await?.json()?;
//!
//! // Or in one step, failing on non-2xx statuses
//! let stock: Stock = client.get_json("stock/1").await?;
//! ```

mod error;
mod response;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

pub use error::FetchError;
pub use response::Response;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for making outbound requests.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Duration,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        let url = self.resolve(url.into());
        let mut builder = self.http.get(&url).timeout(self.timeout);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        ClientRequestBuilder { url, builder }
    }

    /// GET a resource and decode it as JSON, failing on non-2xx statuses.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: impl Into<String>,
    ) -> Result<T, FetchError> {
        self.get(url).send().await?.error_for_status()?.json()
    }

    fn resolve(&self, url: String) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(&url) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    url: String,
    builder: reqwest::RequestBuilder,
}

impl ClientRequestBuilder {
    /// The fully resolved request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and buffer the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        tracing::debug!(url = %self.url, "sending request");

        let response = self.builder.send().await.map_err(|e| {
            tracing::debug!(url = %self.url, error = %e, "request failed");
            FetchError::from(e)
        })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(url = %self.url, status, bytes = body.len(), "response received");

        Ok(Response::new(status, headers, body))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Response};
}
