//! Conversions between greeter native types and protobuf types.
//!
//! Both directions are lossless: each shape carries a single string field.

use crate::proto;
use crate::{GreetRequest, GreetResponse};

// =============================================================================
// Native → Proto
// =============================================================================

impl From<GreetRequest> for proto::SayHelloRequest {
    fn from(r: GreetRequest) -> Self {
        proto::SayHelloRequest { name: r.name }
    }
}

impl From<GreetResponse> for proto::SayHelloResponse {
    fn from(r: GreetResponse) -> Self {
        proto::SayHelloResponse { message: r.message }
    }
}

// =============================================================================
// Proto → Native
// =============================================================================

impl From<proto::SayHelloRequest> for GreetRequest {
    fn from(p: proto::SayHelloRequest) -> Self {
        GreetRequest { name: p.name }
    }
}

impl From<proto::SayHelloResponse> for GreetResponse {
    fn from(p: proto::SayHelloResponse) -> Self {
        GreetResponse { message: p.message }
    }
}
