//! gRPC listener and daemon configuration.
//!
//! This module provides:
//! - The gRPC service implementation (`service`)
//! - The listener that binds, secures and serves it (`listener`)
//! - Configuration types (`config`)
//!
//! # Transport Extensibility
//!
//! Only TCP transport is supported. Plaintext and TLS are the same listener
//! parameterized by [`TransportSecurity`](crate::TransportSecurity).

pub mod config;
pub mod listener;
pub mod service;

pub use listener::{ConfiguredListener, RpcListener};
pub use service::GreeterHandler;
