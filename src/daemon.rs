//! Startup orchestration for greeterd.
//!
//! Order matters: the gRPC listener is bound and configured first, so a taken
//! port or a bad TLS identity fails startup before the gateway exists. Only
//! then is the listener's serve task started, the upstream channel dialed and
//! the gateway bound. Any startup error is returned immediately; nothing is
//! retried.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use tracing::info;

use crate::gateway::{HttpGateway, Upstream};
use crate::server::RpcListener;
use crate::server::config::Config;
use crate::supervisor::{Supervisor, Unit};
use crate::telemetry::trace::Telemetry;
use crate::Result;

/// Both units started and supervised.
pub struct Running {
    pub supervisor: Supervisor,
    /// Bound gRPC address.
    pub rpc_addr: SocketAddr,
    /// Bound HTTP gateway address.
    pub gateway_addr: SocketAddr,
}

/// Bind, dial and spawn both units according to `config`.
pub async fn launch(config: &Config, telemetry: Option<Telemetry>) -> Result<Running> {
    let security = config.transport_security()?;
    let rpc_bind = config.server_addr()?;
    let gateway_bind = config.gateway_addr()?;

    let listener = RpcListener::bind(rpc_bind).await?;
    let rpc_addr = listener.local_addr();
    info!(addr = %rpc_addr, "gRPC listener bound");

    let listener = listener.configure(&security, telemetry.clone())?;

    let mut supervisor = Supervisor::new();
    supervisor.spawn(Unit::RpcListener, listener.serve());

    let target = match &config.gateway.upstream {
        Some(upstream) => upstream.clone(),
        None => dial_target(rpc_addr).to_string(),
    };
    let upstream = Upstream::dial(&target, &security, telemetry).await?;

    let gateway = HttpGateway::bind(gateway_bind, upstream).await?;
    let gateway_addr = gateway.local_addr();
    supervisor.spawn(Unit::HttpGateway, gateway.serve());

    Ok(Running {
        supervisor,
        rpc_addr,
        gateway_addr,
    })
}

/// Loopback address for dialing a listener bound to a wildcard address.
fn dial_target(bound: SocketAddr) -> SocketAddr {
    let ip = match bound.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, bound.port())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_is_dialed_on_loopback() {
        let target = dial_target("0.0.0.0:8080".parse().unwrap());
        assert_eq!(target, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());

        let target = dial_target("[::]:8080".parse().unwrap());
        assert_eq!(target, "[::1]:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn concrete_address_is_kept() {
        let addr: SocketAddr = "10.0.0.7:9000".parse().unwrap();
        assert_eq!(dial_target(addr), addr);
    }
}
