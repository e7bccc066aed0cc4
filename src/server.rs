//! HTTP server exposing the scrape endpoint.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use heka_exporter::{Collector, HttpStatusSource, MetricsServer};
//!
//! # async fn run() -> Result<(), heka_exporter::ExporterError> {
//! let url = "http://localhost:4352/data/heka_report.json".parse().unwrap();
//! let source = HttpStatusSource::builder(url).build()?;
//! let collector = Arc::new(Collector::new(Arc::new(source), "heka"));
//!
//! let server = MetricsServer::bind("0.0.0.0:9111".parse().unwrap(), "/metrics", collector).await?;
//! server.serve().await?;
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::collector::Collector;
use crate::prometheus;
use crate::ExporterError;

/// Pause after a failed accept, so persistent errors such as running out of
/// file descriptors do not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound scrape server.
#[derive(Debug)]
pub struct MetricsServer {
    listener: TcpListener,
    metrics_path: String,
    collector: Arc<Collector>,
}

impl MetricsServer {
    /// Bind the listener. Failing to bind is fatal for the exporter.
    pub async fn bind(
        addr: SocketAddr,
        metrics_path: impl Into<String>,
        collector: Arc<Collector>,
    ) -> Result<Self, ExporterError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ExporterError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            metrics_path: metrics_path.into(),
            collector,
        })
    }

    /// The address actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, ExporterError> {
        self.listener
            .local_addr()
            .map_err(|e| ExporterError::Config(format!("listener has no local address: {e}")))
    }

    /// Accept connections until the task is dropped.
    ///
    /// Each connection is served on its own task; each request to the metrics
    /// path triggers a fresh scrape.
    pub async fn serve(self) -> Result<(), ExporterError> {
        let metrics_path: Arc<str> = Arc::from(self.metrics_path);
        let listener = &self.listener;

        loop {
            let (stream, peer) =
                accept_with_backoff(move || listener.accept(), ACCEPT_BACKOFF).await;
            let io = TokioIo::new(stream);

            let metrics_path = metrics_path.clone();
            let collector = self.collector.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let metrics_path = metrics_path.clone();
                    let collector = collector.clone();

                    async move { handle_request(req, &metrics_path, &collector).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(%peer, error = %e, "Scrape connection error");
                }
            });
        }
    }
}

/// Retry `accept` until it succeeds, sleeping `backoff` after each failure.
async fn accept_with_backoff<T, E, F, Fut>(mut accept: F, backoff: Duration) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    loop {
        match accept().await {
            Ok(conn) => return conn,
            Err(e) => {
                warn!(
                    error = %e,
                    backoff_ms = backoff.as_millis() as u64,
                    "Failed to accept connection"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    metrics_path: &str,
    collector: &Collector,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path();

    if path == metrics_path {
        let body = collector.scrape().await;
        Ok(text_response(StatusCode::OK, prometheus::CONTENT_TYPE, body))
    } else if path == "/health" || path == "/healthz" {
        Ok(text_response(StatusCode::OK, "text/plain", "OK"))
    } else {
        Ok(text_response(StatusCode::NOT_FOUND, "text/plain", "Not Found"))
    }
}

fn text_response(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
