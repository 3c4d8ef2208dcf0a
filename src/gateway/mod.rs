//! JSON/HTTP gateway in front of the gRPC listener.
//!
//! The gateway does not call the greeting handler directly. Every HTTP
//! request is translated into a `SayHelloRequest`, sent to the listener over
//! an [`Upstream`] channel, and the reply is rendered back as JSON.

mod routes;
pub mod status;
mod upstream;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::{GreeterError, Result};

pub use routes::router;
pub use status::GatewayError;
pub use upstream::Upstream;

/// A bound HTTP gateway, not yet serving.
pub struct HttpGateway {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl HttpGateway {
    /// Bind the HTTP listener and build the routing table over `upstream`.
    pub async fn bind(addr: SocketAddr, upstream: Upstream) -> Result<Self> {
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
            router: router(upstream),
        })
    }

    /// Address the gateway is bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve HTTP until a fatal error.
    pub async fn serve(self) -> Result<()> {
        info!(addr = %self.local_addr, "HTTP gateway serving");
        axum::serve(self.listener, self.router)
            .await
            .map_err(|e| GreeterError::Serve(format!("HTTP gateway: {e}")))
    }
}
