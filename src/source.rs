//! Fetching the Pi-hole status document.
//!
//! The source only buffers the body; parsing belongs to
//! [`parse_document`](crate::flatten::parse_document).
//!
//! ## Example
//!
//! ```rust,no_run
//! use pihole_statsd::{PiholeSource, StatSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = PiholeSource::builder().host("192.168.1.28").build()?;
//!     let body = source.fetch().await?;
//!     println!("Fetched {} bytes from {}", body.len(), source.url());
//!     Ok(())
//! }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;

use crate::ExporterError;

/// Path of the summary endpoint on the Pi-hole admin interface.
pub const API_PATH: &str = "/admin/api.php";

/// Anything that can produce a raw status body.
#[async_trait]
pub trait StatSource: Send + Sync + Debug {
    /// Fetch the complete response body.
    async fn fetch(&self) -> Result<Vec<u8>, ExporterError>;
}

/// Status source backed by the Pi-hole HTTP API.
#[derive(Debug, Clone)]
pub struct PiholeSource {
    client: Client,
    url: String,
}

impl PiholeSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> PiholeSourceBuilder {
        PiholeSourceBuilder::default()
    }

    /// The URL that is polled.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatSource for PiholeSource {
    async fn fetch(&self) -> Result<Vec<u8>, ExporterError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(ExporterError::Fetch(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

/// Builder for PiholeSource.
#[derive(Debug, Default)]
pub struct PiholeSourceBuilder {
    host: Option<String>,
    endpoint: Option<String>,
}

impl PiholeSourceBuilder {
    /// Set the Pi-hole host, optionally with a port (e.g., "192.168.1.28:8080").
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the full endpoint URL, overriding the one derived from the host.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<PiholeSource, ExporterError> {
        let client = Client::builder().build()?;

        let url = match (self.endpoint, self.host) {
            (Some(endpoint), _) => endpoint,
            (None, Some(host)) => format!("http://{}{}", host, API_PATH),
            (None, None) => format!("http://localhost{}", API_PATH),
        };

        Ok(PiholeSource { client, url })
    }
}
