//! Configuration loading and validation for the sealing service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use common::protocol::InputEncoding;
use serde::Deserialize;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP(S) server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Filesystem path to a PEM-encoded TLS certificate chain. Must be set
    /// together with `tls_key_path`; when both are absent the service speaks
    /// plain HTTP.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// Filesystem path to the PEM-encoded TLS private key.
    #[serde(default)]
    pub tls_key_path: Option<String>,

    /// OTLP/gRPC collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How request `key` strings become key bytes when a request does not
    /// name an encoding. `utf8` keeps the raw bytes of the string.
    #[serde(default)]
    pub default_key_encoding: InputEncoding,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

/// PEM paths for the TLS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths<'a> {
    pub cert: &'a str,
    pub key: &'a str,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// TLS certificate and key paths, if HTTPS is configured.
    pub fn tls_paths(&self) -> Option<TlsPaths<'_>> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some(TlsPaths { cert, key }),
            _ => None,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => {
                ensure_non_empty(cert, "TLS_CERT_PATH")?;
                ensure_non_empty(key, "TLS_KEY_PATH")?;
            }
            (None, None) => {}
            _ => anyhow::bail!("TLS_CERT_PATH and TLS_KEY_PATH must be set together"),
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty when set");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            listen_port: default_listen_port(),
            tls_cert_path: None,
            tls_key_path: None,
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
            default_key_encoding: InputEncoding::default(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_log_level(), "info");
        assert_eq!(InputEncoding::default(), InputEncoding::Utf8);
    }

    #[test]
    fn validate_accepts_plain_http() {
        let cfg = base();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.tls_paths(), None);
    }

    #[test]
    fn validate_accepts_tls_pair() {
        let cfg = Config {
            tls_cert_path: Some("/etc/seal/tls.crt".into()),
            tls_key_path: Some("/etc/seal/tls.key".into()),
            ..base()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.tls_paths(),
            Some(TlsPaths {
                cert: "/etc/seal/tls.crt",
                key: "/etc/seal/tls.key"
            })
        );
    }

    #[test]
    fn validate_rejects_half_tls_config() {
        let cfg = Config {
            tls_cert_path: Some("/etc/seal/tls.crt".into()),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_otel_endpoint() {
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("   ".into()),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }
}
