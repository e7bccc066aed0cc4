//! Status source abstraction for fetching Heka reports.
//!
//! The collector does not care where a report comes from; it asks a
//! [`StatusSource`] for a fresh [`StatusDocument`] on every scrape.

mod http;

pub use http::{HttpStatusSource, HttpStatusSourceBuilder};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{ExporterError, StatusDocument};

/// Trait for fetching status reports from a Heka instance.
///
/// Implementations must not cache: every call reflects the upstream state at
/// the time of the call.
#[async_trait]
pub trait StatusSource: Send + Sync + Debug {
    /// Fetch and decode the current status report.
    async fn fetch(&self) -> Result<StatusDocument, ExporterError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used in log messages.
    fn description(&self) -> &str;
}
