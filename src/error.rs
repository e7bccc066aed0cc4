//! Error types for the exporter.

use thiserror::Error;

/// Errors that can occur while configuring the exporter or collecting a scrape.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Invalid or missing configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Connection to the upstream status endpoint failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for the upstream response.
    #[error("Request timed out")]
    Timeout,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream answered with something other than 200 OK.
    #[error("Status {0} unexpected")]
    Status(u16),

    /// Failed to decode the status document.
    #[error("Failed to decode status document: {0}")]
    Decode(String),

    /// The scrape listener could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ExporterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExporterError::Timeout
        } else if err.is_connect() {
            ExporterError::Connection(err.to_string())
        } else if err.is_decode() {
            ExporterError::Decode(err.to_string())
        } else {
            ExporterError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Decode(err.to_string())
    }
}

impl From<config::ConfigError> for ExporterError {
    fn from(err: config::ConfigError) -> Self {
        ExporterError::Config(err.to_string())
    }
}
