//! Greeter - one RPC method served over gRPC and a JSON/HTTP gateway
//!
//! The greeting itself is a single format string. What this crate shows is
//! the wiring around it: a tonic listener with reflection and optional TLS,
//! an HTTP gateway that forwards JSON requests to that listener over a real
//! gRPC channel, and OpenTelemetry spans propagated across the hop.
//!
//! # Serving both transports
//!
//! ```rust,no_run
//! use greeter::server::config::Config;
//! use greeter::daemon;
//!
//! #[tokio::main]
//! async fn main() -> greeter::Result<()> {
//!     let config = Config::default();
//!     let running = daemon::launch(&config, None).await?;
//!
//!     println!("gRPC on {}, HTTP on {}", running.rpc_addr, running.gateway_addr);
//!     running.supervisor.run().await
//! }
//! ```
//!
//! # Calling the service
//!
//! ```rust,no_run
//! use greeter::client::ServiceClient;
//!
//! #[tokio::main]
//! async fn main() -> greeter::Result<()> {
//!     let client = ServiceClient::connect("http://127.0.0.1:8080").await?;
//!     let response = client.say_hello("World").await?;
//!     assert_eq!(response.message, "Hello, World!");
//!     Ok(())
//! }
//! ```

mod convert;
pub mod error;
pub mod greeting;
pub mod proto;
pub mod security;
pub mod telemetry;
pub mod types;
pub mod version;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
pub mod daemon;
#[cfg(feature = "server")]
pub mod gateway;
#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod supervisor;

// Re-export main types at crate root
pub use error::{GreeterError, Result};
pub use greeting::greet;
pub use security::{TlsCredentials, TransportSecurity};
pub use types::{ErrorBody, GreetRequest, GreetResponse};
pub use version::{PKG_VERSION, version_string};
