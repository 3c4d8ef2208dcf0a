//! Server reflection against a running listener.

#![cfg(all(feature = "server", feature = "client"))]

use greeter::client::ServiceClient;
use greeter::daemon;
use greeter::proto::SERVICE_NAME;
use greeter::server::config::Config;

async fn connect() -> ServiceClient {
    let mut config = Config::default();
    config.server.address = "127.0.0.1:0".to_string();
    config.gateway.address = "127.0.0.1:0".to_string();
    config.telemetry.traces = false;

    let running = daemon::launch(&config, None).await.unwrap();
    let addr = running.rpc_addr;
    tokio::spawn(running.supervisor.run());

    ServiceClient::connect(format!("http://{addr}")).await.unwrap()
}

#[tokio::test]
async fn lists_only_the_greeter_service() {
    let client = connect().await;
    let services = client.list_services().await.unwrap();
    assert_eq!(services, vec![SERVICE_NAME.to_string()]);
}

#[tokio::test]
async fn describes_say_hello() {
    let client = connect().await;
    let description = client.describe_service(SERVICE_NAME).await.unwrap();

    assert_eq!(description.name, SERVICE_NAME);
    assert_eq!(description.methods.len(), 1);

    let method = &description.methods[0];
    assert_eq!(method.name, "SayHello");
    assert_eq!(method.input_type, "greeter.v1.SayHelloRequest");
    assert_eq!(method.output_type, "greeter.v1.SayHelloResponse");
    assert!(!method.client_streaming);
    assert!(!method.server_streaming);
}

#[tokio::test]
async fn unknown_symbol_is_an_error() {
    let client = connect().await;
    assert!(client.describe_service("nope.v1.Missing").await.is_err());
}
