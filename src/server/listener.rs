//! The gRPC listener.
//!
//! Binding, configuring and serving are separate steps so the caller learns
//! about a taken port or an unusable TLS identity before anything else (in
//! particular the gateway) is started.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::info;

use super::GreeterHandler;
use crate::proto::greeter_service_server::GreeterServiceServer;
use crate::proto::FILE_DESCRIPTOR_SET;
use crate::telemetry::trace::{self, Telemetry};
use crate::{GreeterError, Result, TransportSecurity};

/// A bound gRPC listener, not yet serving.
#[derive(Debug)]
pub struct RpcListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl RpcListener {
    /// Bind the listener socket.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GreeterError::Bind {
                addr,
                message: e.to_string(),
            })?;
        let local_addr = listener.local_addr().map_err(|e| GreeterError::Bind {
            addr,
            message: e.to_string(),
        })?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Address the listener is bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Register the greeter and reflection services and apply transport security.
    ///
    /// Reflection advertises only the greeter service, not itself. A bad
    /// server identity or descriptor set fails here, before anything is served.
    pub fn configure(
        self,
        security: &TransportSecurity,
        telemetry: Option<Telemetry>,
    ) -> Result<ConfiguredListener> {
        let reflection = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .include_reflection_service(false)
            .build_v1()
            .map_err(|e| GreeterError::Registration(format!("reflection service: {e}")))?;

        let mut server = Server::builder();
        if let TransportSecurity::Tls(credentials) = security {
            server = server
                .tls_config(credentials.server_config())
                .map_err(|e| GreeterError::Tls(format!("invalid server identity: {e}")))?;
        }

        let router = server
            .trace_fn(move |request: &http::Request<()>| {
                trace::request_span(telemetry.as_ref(), request)
            })
            .add_service(GreeterServiceServer::new(GreeterHandler))
            .add_service(reflection);

        Ok(ConfiguredListener {
            listener: self.listener,
            local_addr: self.local_addr,
            tls: security.is_tls(),
            router,
        })
    }
}

/// A bound listener with its services registered, ready to serve.
pub struct ConfiguredListener {
    listener: TcpListener,
    local_addr: SocketAddr,
    tls: bool,
    router: Router,
}

impl ConfiguredListener {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until a fatal error.
    pub async fn serve(self) -> Result<()> {
        info!(addr = %self.local_addr, tls = self.tls, "gRPC listener serving");
        self.router
            .serve_with_incoming(TcpListenerStream::new(self.listener))
            .await
            .map_err(|e| GreeterError::Serve(format!("gRPC listener: {e}")))
    }
}
