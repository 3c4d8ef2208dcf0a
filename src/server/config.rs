//! Configuration loading for greeterd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.greeter/config.toml` (user)
//! 3. `/etc/greeter/config.toml` (system)
//! 4. Built-in defaults (gRPC on `0.0.0.0:8080`, gateway on `0.0.0.0:8081`, plaintext)

use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::{GreeterError, Result, TlsCredentials, TransportSecurity};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// TLS material; plaintext when absent.
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// gRPC listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080).
    #[serde(default = "default_server_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
        }
    }
}

fn default_server_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Address to bind to (default: 0.0.0.0:8081).
    #[serde(default = "default_gateway_address")]
    pub address: String,
    /// gRPC address the gateway dials, as `host:port`.
    ///
    /// Derived from the bound listener when unset.
    #[serde(default)]
    pub upstream: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            address: default_gateway_address(),
            upstream: None,
        }
    }
}

fn default_gateway_address() -> String {
    "0.0.0.0:8081".to_string()
}

/// TLS file locations.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// PEM certificate chain presented by the listener.
    pub cert: PathBuf,
    /// PEM private key for `cert`.
    pub key: PathBuf,
    /// Trust root the gateway verifies the listener against (default: `cert`).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
    /// Server name the gateway expects (default: "localhost").
    #[serde(default)]
    pub domain: Option<String>,
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Export spans to stdout (default: true).
    #[serde(default = "default_traces")]
    pub traces: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            traces: default_traces(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_traces() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; an error if missing)
    /// 2. `~/.greeter/config.toml`
    /// 3. `/etc/greeter/config.toml`
    /// 4. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GreeterError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GreeterError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(GreeterError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".greeter").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/greeter/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Parsed gRPC listener address.
    pub fn server_addr(&self) -> Result<SocketAddr> {
        parse_addr("server.address", &self.server.address)
    }

    /// Parsed gateway listener address.
    pub fn gateway_addr(&self) -> Result<SocketAddr> {
        parse_addr("gateway.address", &self.gateway.address)
    }

    /// Load TLS material, or plaintext when no `[tls]` section is present.
    pub fn transport_security(&self) -> Result<TransportSecurity> {
        let Some(tls) = &self.tls else {
            return Ok(TransportSecurity::Plaintext);
        };

        let mut credentials = TlsCredentials::from_files(&tls.cert, &tls.key)?;
        if let Some(ca) = &tls.ca_cert {
            credentials = credentials.with_ca_file(ca)?;
        }
        if let Some(domain) = &tls.domain {
            credentials = credentials.with_domain(domain);
        }
        Ok(TransportSecurity::Tls(credentials))
    }
}

fn parse_addr(field: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse()
        .map_err(|e| GreeterError::Configuration(format!("Invalid {field} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0:8080");
        assert_eq!(config.gateway.address, "0.0.0.0:8081");
        assert!(config.gateway.upstream.is_none());
        assert!(config.tls.is_none());
        assert!(config.telemetry.traces);
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9090"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:9090");
        // Defaults preserved
        assert_eq!(config.gateway.address, "0.0.0.0:8081");
        assert!(config.telemetry.traces);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:8080"

            [gateway]
            address = "127.0.0.1:8081"
            upstream = "localhost:8080"

            [tls]
            cert = "/etc/greeter/server.pem"
            key = "/etc/greeter/server.key"
            ca_cert = "/etc/greeter/ca.pem"
            domain = "greeter.internal"

            [telemetry]
            traces = false
            log_filter = "greeter=debug"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateway.upstream.as_deref(), Some("localhost:8080"));
        let tls = config.tls.unwrap();
        assert_eq!(tls.cert, PathBuf::from("/etc/greeter/server.pem"));
        assert_eq!(tls.ca_cert, Some(PathBuf::from("/etc/greeter/ca.pem")));
        assert_eq!(tls.domain.as_deref(), Some("greeter.internal"));
        assert!(!config.telemetry.traces);
        assert_eq!(config.telemetry.log_filter, "greeter=debug");
    }

    #[test]
    fn addresses_parse() {
        let config = Config::default();
        assert_eq!(config.server_addr().unwrap().port(), 8080);
        assert_eq!(config.gateway_addr().unwrap().port(), 8081);
    }

    #[test]
    fn invalid_address_is_configuration_error() {
        let mut config = Config::default();
        config.server.address = "not-an-address".to_string();
        let err = config.server_addr().unwrap_err();
        assert!(matches!(err, GreeterError::Configuration(_)));
        assert!(err.to_string().contains("server.address"));
    }

    #[test]
    fn no_tls_section_is_plaintext() {
        let security = Config::default().transport_security().unwrap();
        assert!(!security.is_tls());
    }

    #[test]
    fn missing_tls_files_fail() {
        let toml = r#"
            [tls]
            cert = "/nonexistent/server.pem"
            key = "/nonexistent/server.key"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.transport_security(),
            Err(GreeterError::Tls(_))
        ));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [server]
            address = "127.0.0.1:9090"

            [telemetry]
            traces = false
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server_addr().unwrap().port(), 9090);
        assert_eq!(config.gateway.address, "0.0.0.0:8081");
        assert!(!config.telemetry.traces);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\naddress = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, GreeterError::Configuration(_)));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn tls_section_loads_credentials_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("server.pem");
        let key = dir.path().join("server.key");
        fs::write(&cert, "cert").unwrap();
        fs::write(&key, "key").unwrap();

        let config = Config {
            tls: Some(TlsConfig {
                cert,
                key,
                ca_cert: None,
                domain: Some("greeter.internal".to_string()),
            }),
            ..Config::default()
        };

        match config.transport_security().unwrap() {
            TransportSecurity::Tls(credentials) => {
                assert_eq!(credentials.domain(), "greeter.internal");
            }
            TransportSecurity::Plaintext => panic!("expected TLS"),
        }
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }
}
