//! Transport security for the gRPC hop.
//!
//! The listener and the gateway's outbound channel share one
//! [`TransportSecurity`] value, so their encryption posture always matches.

use std::fs;
use std::path::Path;

use tonic::transport::{Certificate, ClientTlsConfig, Identity, ServerTlsConfig};

use crate::{GreeterError, Result};

/// Server name verified on outbound TLS dials when none is configured.
pub const DEFAULT_TLS_DOMAIN: &str = "localhost";

/// How the gRPC listener and its clients secure the connection.
#[derive(Debug, Clone, Default)]
pub enum TransportSecurity {
    /// Unencrypted HTTP/2.
    #[default]
    Plaintext,
    /// TLS with the given credential material.
    Tls(TlsCredentials),
}

impl TransportSecurity {
    /// URI scheme clients must dial with.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Plaintext => "http",
            Self::Tls(_) => "https",
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// PEM-encoded TLS material.
#[derive(Clone)]
pub struct TlsCredentials {
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
    ca_pem: Option<Vec<u8>>,
    domain: Option<String>,
}

impl std::fmt::Debug for TlsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsCredentials")
            .field("cert_pem", &format_args!("{} bytes", self.cert_pem.len()))
            .field("key_pem", &"<redacted>")
            .field("ca_pem", &self.ca_pem.as_ref().map(Vec::len))
            .field("domain", &self.domain)
            .finish()
    }
}

impl TlsCredentials {
    /// Build credentials from in-memory PEM.
    pub fn from_pem(cert_pem: impl Into<Vec<u8>>, key_pem: impl Into<Vec<u8>>) -> Self {
        Self {
            cert_pem: cert_pem.into(),
            key_pem: key_pem.into(),
            ca_pem: None,
            domain: None,
        }
    }

    /// Load credentials from PEM files on disk.
    pub fn from_files(cert: &Path, key: &Path) -> Result<Self> {
        Ok(Self::from_pem(read_pem(cert)?, read_pem(key)?))
    }

    /// Trust root the gateway dials with. Defaults to the server certificate.
    pub fn with_ca_pem(mut self, ca_pem: impl Into<Vec<u8>>) -> Self {
        self.ca_pem = Some(ca_pem.into());
        self
    }

    /// Load the trust root from a PEM file.
    pub fn with_ca_file(self, ca: &Path) -> Result<Self> {
        Ok(self.with_ca_pem(read_pem(ca)?))
    }

    /// Server name verified on outbound dials.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_TLS_DOMAIN)
    }

    /// Listener-side configuration: present the server identity.
    pub fn server_config(&self) -> ServerTlsConfig {
        ServerTlsConfig::new().identity(Identity::from_pem(&self.cert_pem, &self.key_pem))
    }

    /// Dial-side configuration.
    ///
    /// This is a separate credential object from the server identity: it
    /// carries only a trust root and the expected server name, and the peer
    /// certificate is always verified against them.
    pub fn client_config(&self) -> ClientTlsConfig {
        let ca = self.ca_pem.as_deref().unwrap_or(&self.cert_pem);
        ClientTlsConfig::new()
            .ca_certificate(Certificate::from_pem(ca))
            .domain_name(self.domain())
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| GreeterError::Tls(format!("Failed to read {path:?}: {e}")))
}
