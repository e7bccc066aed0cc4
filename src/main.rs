use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use heka_exporter::{Collector, ExporterConfig, HttpStatusSource, MetricsServer, Overrides};

#[derive(Parser, Debug)]
#[command(name = "heka-exporter")]
#[command(about = "Prometheus exporter for Heka pipeline status reports")]
#[command(version)]
struct Args {
    /// Address on which to expose metrics and web interface.
    #[arg(long = "web.listen-address", value_name = "ADDR")]
    listen_address: Option<String>,

    /// Path under which to expose Prometheus metrics.
    #[arg(long = "web.telemetry-path", value_name = "PATH")]
    metrics_path: Option<String>,

    /// URL of the Heka status report to expose (required).
    #[arg(long = "heka.url", value_name = "URL")]
    url: Option<String>,

    /// Namespace/prefix for exported metrics.
    #[arg(long = "heka.namespace", value_name = "NAMESPACE")]
    namespace: Option<String>,

    /// Upstream request timeout in seconds (default and 0: none).
    #[arg(long = "heka.timeout", value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Optional config file (TOML, YAML or JSON).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(self) -> Overrides {
        Overrides {
            config_file: self.config,
            listen_address: self.listen_address,
            metrics_path: self.metrics_path,
            url: self.url,
            namespace: self.namespace,
            timeout_secs: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heka_exporter=info")),
        )
        .init();

    let args = Args::parse();

    let config = ExporterConfig::load(&args.overrides())?;
    let url = config.upstream_url()?;
    let listen_addr = config.listen_addr()?;

    let source = HttpStatusSource::builder(url.clone())
        .timeout(config.timeout())
        .build()?;
    let collector = Arc::new(Collector::new(Arc::new(source), config.namespace.clone()));

    let server = MetricsServer::bind(listen_addr, config.metrics_path.clone(), collector).await?;

    info!(
        upstream = %url,
        listen = %listen_addr,
        path = %config.metrics_path,
        namespace = %config.namespace,
        "Exposing heka metrics"
    );

    tokio::select! {
        result = server.serve() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    Ok(())
}
