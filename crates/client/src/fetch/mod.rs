//! HTTP fetch of the product page.
//!
//! One GET per check, no retries. A non-2xx status is returned to the caller
//! rather than raised, because the pipeline classifies it separately from
//! transport failures. The body is only read for successful responses.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use url::Url;

use sizewatch_core::{AppConfig, Error, error_chain};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "sizewatch/0.1")
    pub user_agent: String,

    /// Request timeout; `None` keeps the client default.
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "sizewatch/0.1".to_string(), timeout: None }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.fetch_timeout() }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Response body; empty unless the status is 2xx
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// HTTP client for product pages.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a page, returning its status and, for 2xx responses, its body.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("network error: {}", error_chain(&e))))?;

        let status = response.status();
        let final_url = response.url().clone();

        let body = if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| Error::FetchFailed(format!("failed to read response: {}", error_chain(&e))))?
        } else {
            String::new()
        };

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} ({}) in {}ms ({} bytes)", url, final_url, status, fetch_ms, body.len());

        Ok(FetchResponse { url: url.clone(), final_url, status, body, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
