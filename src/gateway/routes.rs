//! HTTP routing table for the gateway.
//!
//! ```text
//! GET  /v1/greeter/hello?name=...              query → SayHelloRequest
//! POST /v1/greeter/hello                        body  → SayHelloRequest
//! POST /greeter.v1.GreeterService/SayHello      body  → SayHelloRequest
//! ```

use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::Json;
use tracing::Instrument;

use super::Upstream;
use super::status::GatewayError;
use crate::proto::{HTTP_HELLO_PATH, HTTP_SAY_HELLO_METHOD_PATH};
use crate::telemetry::{self, TRANSPORT_HTTP};
use crate::{GreetRequest, GreetResponse};

/// Build the gateway router, forwarding every route to `upstream`.
pub fn router(upstream: Upstream) -> Router {
    Router::new()
        .route(HTTP_HELLO_PATH, get(say_hello_query).post(say_hello_body))
        .route(HTTP_SAY_HELLO_METHOD_PATH, post(say_hello_body))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(upstream)
}

async fn say_hello_query(
    State(upstream): State<Upstream>,
    query: Result<Query<GreetRequest>, QueryRejection>,
) -> Result<Json<GreetResponse>, GatewayError> {
    let Query(request) = query.map_err(GatewayError::invalid_query)?;
    forward(&upstream, request).await
}

async fn say_hello_body(
    State(upstream): State<Upstream>,
    body: Bytes,
) -> Result<Json<GreetResponse>, GatewayError> {
    // An empty body is an empty message, not a decode error.
    let request = if body.is_empty() {
        GreetRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(GatewayError::invalid_body)?
    };
    forward(&upstream, request).await
}

async fn not_found() -> GatewayError {
    GatewayError::not_found()
}

async fn method_not_allowed() -> GatewayError {
    GatewayError::method_not_allowed()
}

async fn forward(
    upstream: &Upstream,
    request: GreetRequest,
) -> Result<Json<GreetResponse>, GatewayError> {
    let start = Instant::now();
    let span = tracing::info_span!(
        "gateway.request",
        rpc.method = HTTP_SAY_HELLO_METHOD_PATH,
        upstream = upstream.uri(),
    );
    let result = upstream.say_hello(request).instrument(span).await;
    telemetry::record_request(TRANSPORT_HTTP, start, result.is_ok());

    match result {
        Ok(response) => Ok(Json(response)),
        Err(status) => {
            tracing::warn!(code = ?status.code(), error = status.message(), "upstream call failed");
            Err(status.into())
        }
    }
}
