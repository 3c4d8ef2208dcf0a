//! gRPC service implementation.

use std::time::Instant;

use tonic::{Request, Response, Status};
use tracing::debug;

use crate::proto;
use crate::proto::greeter_service_server::GreeterService;
use crate::telemetry::{self, TRANSPORT_GRPC};
use crate::GreetRequest;

/// gRPC handler for `greeter.v1.GreeterService`.
///
/// Stateless; every request is answered from its own payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreeterHandler;

#[tonic::async_trait]
impl GreeterService for GreeterHandler {
    async fn say_hello(
        &self,
        request: Request<proto::SayHelloRequest>,
    ) -> Result<Response<proto::SayHelloResponse>, Status> {
        let start = Instant::now();
        let request: GreetRequest = request.into_inner().into();
        let response = request.respond();

        debug!(name = %request.name, "greeting");
        telemetry::record_request(TRANSPORT_GRPC, start, true);

        Ok(Response::new(response.into()))
    }
}
