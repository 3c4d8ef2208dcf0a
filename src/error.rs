//! Greeter error types

use std::net::SocketAddr;

/// Greeter error types
#[derive(Debug, thiserror::Error)]
pub enum GreeterError {
    // Startup errors
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: SocketAddr, message: String },

    #[error("failed to dial {target}: {message}")]
    Dial { target: String, message: String },

    #[error("service registration failed: {0}")]
    Registration(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Runtime errors
    #[error("serve error: {0}")]
    Serve(String),

    #[error("RPC failed ({code:?}): {message}")]
    Rpc { code: tonic::Code, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A supervised unit stopped with an error.
    #[error("{unit} failed: {source}")]
    UnitFailed {
        unit: &'static str,
        #[source]
        source: Box<GreeterError>,
    },
}

impl GreeterError {
    /// Whether this error happens before a unit starts serving.
    ///
    /// Startup errors are never worth retrying in-process: the port is taken,
    /// the peer is unreachable or the configuration is wrong.
    pub fn is_startup(&self) -> bool {
        match self {
            Self::Bind { .. }
            | Self::Dial { .. }
            | Self::Registration(_)
            | Self::Tls(_)
            | Self::Configuration(_) => true,
            Self::UnitFailed { source, .. } => source.is_startup(),
            _ => false,
        }
    }
}

impl From<tonic::Status> for GreeterError {
    fn from(status: tonic::Status) -> Self {
        GreeterError::Rpc {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}

/// Result type alias for Greeter operations
pub type Result<T> = std::result::Result<T, GreeterError>;
