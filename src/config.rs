//! Exporter configuration.
//!
//! Settings are layered, later layers overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. an optional config file (TOML, YAML or JSON, picked by extension)
//! 3. environment variables prefixed with `HEKA_EXPORTER_`
//! 4. command-line flags
//!
//! A non-empty namespace must itself be a valid metric name, since it prefixes
//! every exported metric.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use reqwest::Url;
use serde::Deserialize;

use crate::prometheus::is_valid_metric_name;
use crate::ExporterError;

/// Default address for the scrape endpoint.
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9111";

/// Default path for the scrape endpoint.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Default metric namespace.
pub const DEFAULT_NAMESPACE: &str = "heka";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "HEKA_EXPORTER";

/// Values supplied on the command line. `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub listen_address: Option<String>,
    pub metrics_path: Option<String>,
    pub url: Option<String>,
    pub namespace: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Merged exporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExporterConfig {
    /// Address the scrape endpoint listens on. `:port` means all interfaces.
    pub listen_address: String,
    /// Path of the scrape endpoint.
    pub metrics_path: String,
    /// Heka status report URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Namespace prefixed to every metric name.
    pub namespace: String,
    /// Optional upstream request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ExporterConfig {
    /// Load settings from every layer.
    pub fn load(overrides: &Overrides) -> Result<Self, ExporterError> {
        Self::load_with_env(overrides, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(overrides: &Overrides, env: Environment) -> Result<Self, ExporterError> {
        let mut builder = Config::builder()
            .set_default("listen_address", DEFAULT_LISTEN_ADDRESS)?
            .set_default("metrics_path", DEFAULT_METRICS_PATH)?
            .set_default("namespace", DEFAULT_NAMESPACE)?;

        if let Some(path) = &overrides.config_file {
            builder = builder.add_source(File::from(path.as_path()));
        }

        let config = builder
            .add_source(env.try_parsing(true))
            .set_override_option("listen_address", overrides.listen_address.clone())?
            .set_override_option("metrics_path", overrides.metrics_path.clone())?
            .set_override_option("url", overrides.url.clone())?
            .set_override_option("namespace", overrides.namespace.clone())?
            .set_override_option("timeout_secs", overrides.timeout_secs)?
            .build()?;

        let config: Self = config.try_deserialize()?;

        if !config.namespace.is_empty() && !is_valid_metric_name(&config.namespace) {
            return Err(ExporterError::Config(format!(
                "--heka.namespace {:?} invalid: must match [a-zA-Z_:][a-zA-Z0-9_:]*",
                config.namespace
            )));
        }

        Ok(config)
    }

    /// The validated upstream URL.
    ///
    /// The URL is required and must carry a host.
    pub fn upstream_url(&self) -> Result<Url, ExporterError> {
        let raw = match self.url.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ExporterError::Config("--heka.url required".to_string())),
        };

        let url = Url::parse(raw)
            .map_err(|e| ExporterError::Config(format!("--heka.url {raw:?}: {e}")))?;

        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(url),
            _ => Err(ExporterError::Config(format!("--heka.url {raw:?} invalid: no host"))),
        }
    }

    /// The socket address to listen on.
    pub fn listen_addr(&self) -> Result<SocketAddr, ExporterError> {
        let address = &self.listen_address;
        let full = if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.clone()
        };

        full.parse().map_err(|e| {
            ExporterError::Config(format!("invalid listen address {address:?}: {e}"))
        })
    }

    /// The upstream request timeout, if any. Zero means no timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with_url(url: &str) -> ExporterConfig {
        ExporterConfig::load(&Overrides {
            url: Some(url.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_with_url("http://localhost:4352/data/heka_report.json");

        assert_eq!(config.listen_address, ":9111");
        assert_eq!(config.metrics_path, "/metrics");
        assert_eq!(config.namespace, "heka");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_overrides_win() {
        let config = ExporterConfig::load(&Overrides {
            listen_address: Some("127.0.0.1:9200".to_string()),
            metrics_path: Some("/heka".to_string()),
            url: Some("http://heka:4352/".to_string()),
            namespace: Some("pipeline".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            config.listen_addr().unwrap(),
            "127.0.0.1:9200".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.metrics_path, "/heka");
        assert_eq!(config.namespace, "pipeline");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_config_file_layer() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            url = "http://from-file:4352/data/heka_report.json"
            namespace = "filens"
            timeout_secs = 3
            "#
        )
        .unwrap();
        file.flush().unwrap();

        let config = ExporterConfig::load(&Overrides {
            config_file: Some(file.path().to_path_buf()),
            namespace: Some("flagns".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.upstream_url().unwrap().host_str(), Some("from-file"));
        assert_eq!(config.namespace, "flagns");
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.metrics_path, "/metrics");
    }

    #[test]
    fn test_env_layer_between_file_and_flags() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            url = "http://from-file:4352/data/heka_report.json"
            namespace = "filens"
            timeout_secs = 3
            "#
        )
        .unwrap();
        file.flush().unwrap();

        let mut vars = config::Map::new();
        vars.insert(
            "HEKA_EXPORTER_URL".to_string(),
            "http://from-env:4352/data/heka_report.json".to_string(),
        );
        vars.insert("HEKA_EXPORTER_TIMEOUT_SECS".to_string(), "7".to_string());
        vars.insert("HEKA_EXPORTER_NAMESPACE".to_string(), "envns".to_string());
        vars.insert("UNRELATED_METRICS_PATH".to_string(), "/ignored".to_string());
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let config = ExporterConfig::load_with_env(
            &Overrides {
                config_file: Some(file.path().to_path_buf()),
                namespace: Some("flagns".to_string()),
                ..Default::default()
            },
            env,
        )
        .unwrap();

        assert_eq!(config.upstream_url().unwrap().host_str(), Some("from-env"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(7)));
        assert_eq!(config.namespace, "flagns");
        assert_eq!(config.metrics_path, "/metrics");
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let result = ExporterConfig::load(&Overrides {
            url: Some("http://heka/".to_string()),
            namespace: Some("my-ns".to_string()),
            ..Default::default()
        });
        match result {
            Err(ExporterError::Config(message)) => assert!(message.contains("my-ns")),
            other => panic!("expected a config error, got {other:?}"),
        }

        let config = ExporterConfig::load(&Overrides {
            namespace: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.namespace, "");
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = ExporterConfig::load(&Overrides {
            timeout_secs: Some(0),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.timeout_secs, Some(0));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let result = ExporterConfig::load(&Overrides {
            config_file: Some(PathBuf::from("/nonexistent/heka-exporter.toml")),
            ..Default::default()
        });
        assert!(matches!(result, Err(ExporterError::Config(_))));
    }

    #[test]
    fn test_url_required() {
        let config = ExporterConfig::load(&Overrides::default()).unwrap();
        let err = config.upstream_url().unwrap_err();
        assert!(err.to_string().contains("--heka.url required"));

        let err = config_with_url("").upstream_url().unwrap_err();
        assert!(err.to_string().contains("--heka.url required"));
    }

    #[test]
    fn test_url_must_parse_with_host() {
        assert!(config_with_url("not a url").upstream_url().is_err());
        assert!(config_with_url("unix:/var/run/heka.sock").upstream_url().is_err());

        let url = config_with_url("http://127.0.0.1:4352/data/heka_report.json")
            .upstream_url()
            .unwrap();
        assert_eq!(url.port(), Some(4352));
    }

    #[test]
    fn test_listen_addr_forms() {
        let mut config = config_with_url("http://heka/");
        let expected: SocketAddr = "0.0.0.0:9111".parse().unwrap();
        assert_eq!(config.listen_addr().unwrap(), expected);

        config.listen_address = "[::1]:9111".to_string();
        let expected: SocketAddr = "[::1]:9111".parse().unwrap();
        assert_eq!(config.listen_addr().unwrap(), expected);

        config.listen_address = "nowhere".to_string();
        assert!(matches!(config.listen_addr(), Err(ExporterError::Config(_))));
    }
}
