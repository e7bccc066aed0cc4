//! HTTP status source.
//!
//! Polls Heka's dashboard report (typically
//! `http://localhost:4352/data/heka_report.json`) with a single `GET` per
//! fetch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::StatusSource;
use crate::{ExporterError, StatusDocument};

/// Fetches status reports from an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: Client,
    url: Url,
    description: String,
}

impl HttpStatusSource {
    /// Create a new builder for configuring the source.
    pub fn builder(url: Url) -> HttpStatusSourceBuilder {
        HttpStatusSourceBuilder { url, timeout: None }
    }

    /// The endpoint being polled.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusDocument, ExporterError> {
        let response = self.client.get(self.url.clone()).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ExporterError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        debug!(url = %self.url, bytes = body.len(), "Fetched status report");

        StatusDocument::from_slice(&body)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpStatusSource`].
#[derive(Debug)]
pub struct HttpStatusSourceBuilder {
    url: Url,
    timeout: Option<Duration>,
}

impl HttpStatusSourceBuilder {
    /// Set a request timeout. Without one the transport default applies.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpStatusSource, ExporterError> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ExporterError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpStatusSource {
            client,
            description: format!("heka: {}", self.url),
            url: self.url,
        })
    }
}
