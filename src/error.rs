//! Error types for the exporter.

use thiserror::Error;

/// Errors that can occur while polling, formatting or forwarding stats.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// The status endpoint could not be reached or answered with a non-2xx status.
    #[error("Failed to fetch stats: {0}")]
    Fetch(String),

    /// The status body is not a JSON object.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A metric type code outside of `c`, `s`, `g` and `ms`.
    #[error("{0:?} is not a statsd metric type (one of 'c', 's', 'ms', or 'g')")]
    InvalidMetricType(String),

    /// A tag value that is neither a string nor a number.
    #[error("Invalid tag value: {0}")]
    InvalidTagValue(String),

    /// Writing the payload to the transport failed.
    #[error("Failed to send metrics: {0}")]
    Send(#[from] std::io::Error),

    /// The configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for ExporterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExporterError::Fetch("request timed out".to_string())
        } else if err.is_connect() {
            ExporterError::Fetch(format!("connection failed: {}", err))
        } else if err.is_decode() {
            ExporterError::MalformedResponse(err.to_string())
        } else {
            ExporterError::Fetch(err.to_string())
        }
    }
}
