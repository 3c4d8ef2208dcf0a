//! Client library for talking to greeterd.
//!
//! - [`ServiceClient`] speaks gRPC to the listener, including server reflection.
//! - [`GatewayClient`] speaks JSON to the HTTP gateway.

mod gateway_client;
mod service_client;

pub use gateway_client::GatewayClient;
pub use service_client::{MethodDescription, ServiceClient, ServiceDescription};
