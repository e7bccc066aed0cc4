//! Scrape-time collection.
//!
//! A [`Collector`] ties a [`StatusSource`] to the translator and renderer.
//! Each call to [`Collector::scrape`] performs one fetch, one decode, one
//! translation and one render, in that order. Nothing is cached between
//! scrapes; the only state carried across calls is a pair of monotonic
//! counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::metric::MetricRecord;
use crate::prometheus::{format_prometheus, ProcessCounters};
use crate::source::StatusSource;
use crate::translate::translate;

/// Collects Heka metrics on demand.
#[derive(Debug)]
pub struct Collector {
    source: Arc<dyn StatusSource>,
    namespace: String,
    errors_total: AtomicU64,
    malformed_fields_total: AtomicU64,
}

impl Collector {
    /// Create a collector reading from `source` and prefixing metrics with `namespace`.
    pub fn new(source: Arc<dyn StatusSource>, namespace: impl Into<String>) -> Self {
        Self {
            source,
            namespace: namespace.into(),
            errors_total: AtomicU64::new(0),
            malformed_fields_total: AtomicU64::new(0),
        }
    }

    /// The metric namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Current values of the exporter's own counters.
    pub fn counters(&self) -> ProcessCounters {
        ProcessCounters {
            errors_total: self.errors_total.load(Ordering::Relaxed),
            malformed_fields_total: self.malformed_fields_total.load(Ordering::Relaxed),
        }
    }

    /// Fetch and translate the current report.
    ///
    /// On fetch or decode failure the error counter is incremented, the error is
    /// logged and an empty list is returned.
    pub async fn collect(&self) -> Vec<MetricRecord> {
        let doc = match self.source.fetch().await {
            Ok(doc) => doc,
            Err(e) => {
                self.errors_total.fetch_add(1, Ordering::Relaxed);
                warn!(source = self.source.description(), error = %e, "Failed to collect heka metrics");
                return Vec::new();
            }
        };

        let translation = translate(&doc);
        if translation.malformed > 0 {
            self.malformed_fields_total
                .fetch_add(translation.malformed, Ordering::Relaxed);
        }

        debug!(
            records = translation.records.len(),
            malformed = translation.malformed,
            "Translated status report"
        );

        translation.records
    }

    /// Run one scrape and render it in the Prometheus exposition format.
    pub async fn scrape(&self) -> String {
        let records = self.collect().await;
        format_prometheus(&records, &self.namespace, self.counters())
    }
}
