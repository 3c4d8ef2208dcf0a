//! The gateway's outbound gRPC channel.

use tonic::Status;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint};
use tracing::info;

use crate::proto;
use crate::proto::greeter_service_client::GreeterServiceClient;
use crate::telemetry::trace::{Telemetry, TracePropagation};
use crate::{GreetRequest, GreetResponse, GreeterError, Result, TransportSecurity};

type UpstreamClient = GreeterServiceClient<InterceptedService<Channel, TracePropagation>>;

/// Connection from the gateway to the gRPC listener.
///
/// Cloning shares the underlying HTTP/2 channel.
#[derive(Clone)]
pub struct Upstream {
    client: UpstreamClient,
    uri: String,
}

impl Upstream {
    /// Dial the listener at `target` (`host:port`) with the listener's security posture.
    ///
    /// The connection is established eagerly; an unreachable listener is a
    /// [`GreeterError::Dial`].
    pub async fn dial(
        target: &str,
        security: &TransportSecurity,
        telemetry: Option<Telemetry>,
    ) -> Result<Self> {
        let uri = format!("{}://{target}", security.scheme());
        let dial_error = |message: String| GreeterError::Dial {
            target: uri.clone(),
            message,
        };

        let mut endpoint =
            Endpoint::from_shared(uri.clone()).map_err(|e| dial_error(e.to_string()))?;
        if let TransportSecurity::Tls(credentials) = security {
            endpoint = endpoint
                .tls_config(credentials.client_config())
                .map_err(|e| GreeterError::Tls(format!("invalid client TLS config: {e}")))?;
        }

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| dial_error(format!("{e:?}")))?;

        info!(%uri, tls = security.is_tls(), "gateway connected to gRPC listener");

        Ok(Self {
            client: GreeterServiceClient::with_interceptor(channel, TracePropagation::new(telemetry)),
            uri,
        })
    }

    /// URI the channel was dialed with.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Forward one greeting to the listener.
    pub async fn say_hello(&self, request: GreetRequest) -> std::result::Result<GreetResponse, Status> {
        let response = self
            .client
            .clone()
            .say_hello(proto::SayHelloRequest::from(request))
            .await?;
        Ok(response.into_inner().into())
    }
}
