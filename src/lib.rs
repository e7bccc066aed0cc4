//! # heka-exporter
//!
//! A Prometheus exporter for the Heka data-processing pipeline.
//!
//! Heka publishes a JSON status report describing every plugin in its
//! pipeline. This crate polls that report on each scrape, translates each
//! plugin's counters and gauges into Prometheus metrics and serves them in
//! the text exposition format.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  GET   ┌──────────────┐        ┌─────────────┐
//! │ Heka report  │◀───────│ StatusSource │───────▶│ translate() │
//! │ (JSON)       │        │  (source)    │ Status │ (translate) │
//! └──────────────┘        └──────────────┘  Doc   └──────┬──────┘
//!                                                        │ MetricRecord
//!                                                        ▼
//! ┌──────────────┐ scrape ┌──────────────┐        ┌─────────────┐
//! │  Prometheus  │───────▶│ MetricsServer│───────▶│  Collector  │
//! │              │◀───────│  (server)    │  text  │ (collector) │
//! └──────────────┘        └──────────────┘        └─────────────┘
//! ```
//!
//! - **[`normalize`]**: camel case field keys to `snake_case` metric names
//! - **[`metric`]**: [`MetricKind`], the [`Representation`] hint table and [`MetricRecord`]
//! - **[`status`]**: the decoded [`StatusDocument`]
//! - **[`translate`](mod@translate)**: report to records, isolating malformed entries
//! - **[`source`]**: the [`StatusSource`] trait and its HTTP implementation
//! - **[`collector`]**: one fetch-translate-render cycle per scrape, plus process counters
//! - **[`prometheus`]**: exposition format rendering
//! - **[`server`]**: the HTTP scrape endpoint
//! - **[`config`]**: layered settings
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! heka-exporter --heka.url http://localhost:4352/data/heka_report.json
//! curl http://localhost:9111/metrics
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use heka_exporter::{Collector, ExporterError, StatusDocument, StatusSource};
//!
//! #[derive(Debug)]
//! struct Fixed;
//!
//! #[async_trait::async_trait]
//! impl StatusSource for Fixed {
//!     async fn fetch(&self) -> Result<StatusDocument, ExporterError> {
//!         StatusDocument::from_slice(br#"{"outputs": [{
//!             "Name": "FileOutput",
//!             "ProcessMessageCount": {"representation": "count", "value": 42.0}
//!         }]}"#)
//!     }
//!
//!     fn description(&self) -> &str {
//!         "fixed"
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let collector = Collector::new(Arc::new(Fixed), "heka");
//! let text = collector.scrape().await;
//! assert!(text.contains(r#"heka_outputs_process_message_count{name="FileOutput"} 42"#));
//! # });
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod metric;
pub mod normalize;
pub mod prometheus;
pub mod server;
pub mod source;
pub mod status;
pub mod translate;

// Re-export main types for convenience
pub use collector::Collector;
pub use config::{ExporterConfig, Overrides};
pub use error::ExporterError;
pub use metric::{infer_type, MetricKind, MetricRecord, Representation};
pub use normalize::normalize;
pub use server::MetricsServer;
pub use source::{HttpStatusSource, StatusSource};
pub use status::StatusDocument;
pub use translate::{translate, Translation};
