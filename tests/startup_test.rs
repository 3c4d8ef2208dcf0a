//! Startup failures: taken ports and an unreachable upstream.

#![cfg(all(feature = "server", feature = "client"))]

use std::net::TcpListener;
use std::path::PathBuf;

use greeter::daemon;
use greeter::server::config::{Config, TlsConfig};
use greeter::GreeterError;

fn test_config() -> Config {
    let mut config = Config::default();
    config.server.address = "127.0.0.1:0".to_string();
    config.gateway.address = "127.0.0.1:0".to_string();
    config.telemetry.traces = false;
    config
}

#[tokio::test]
async fn grpc_port_in_use_fails_startup() {
    let taken = TcpListener::bind("127.0.0.1:0").unwrap();
    let taken_addr = taken.local_addr().unwrap();

    let mut config = test_config();
    config.server.address = taken_addr.to_string();

    let err = daemon::launch(&config, None).await.err().unwrap();
    assert!(err.is_startup());
    match err {
        GreeterError::Bind { addr, .. } => assert_eq!(addr, taken_addr),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn gateway_port_in_use_fails_startup() {
    let taken = TcpListener::bind("127.0.0.1:0").unwrap();
    let taken_addr = taken.local_addr().unwrap();

    let mut config = test_config();
    config.gateway.address = taken_addr.to_string();

    let err = daemon::launch(&config, None).await.err().unwrap();
    match err {
        GreeterError::Bind { addr, .. } => assert_eq!(addr, taken_addr),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_upstream_fails_startup() {
    let mut config = test_config();
    config.gateway.upstream = Some("127.0.0.1:1".to_string());

    let err = daemon::launch(&config, None).await.err().unwrap();
    assert!(err.is_startup());
    assert!(matches!(err, GreeterError::Dial { .. }), "got {err:?}");
}

#[tokio::test]
async fn invalid_address_fails_before_binding() {
    let mut config = test_config();
    config.server.address = "localhost".to_string();

    let err = daemon::launch(&config, None).await.err().unwrap();
    assert!(matches!(err, GreeterError::Configuration(_)));
}

#[tokio::test]
async fn missing_tls_material_fails_startup() {
    let mut config = test_config();
    config.tls = Some(TlsConfig {
        cert: PathBuf::from("/nonexistent/server.pem"),
        key: PathBuf::from("/nonexistent/server.key"),
        ca_cert: None,
        domain: None,
    });

    let err = daemon::launch(&config, None).await.err().unwrap();
    assert!(matches!(err, GreeterError::Tls(_)));
}
