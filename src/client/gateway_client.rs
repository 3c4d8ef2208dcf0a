//! [`GatewayClient`]: JSON client for the HTTP gateway.

use crate::proto::HTTP_HELLO_PATH;
use crate::{ErrorBody, GreetRequest, GreetResponse, GreeterError, Result};

/// HTTP client for a greeter gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url` (e.g. `http://127.0.0.1:8081`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST a greeting request as JSON.
    pub async fn say_hello(&self, name: impl Into<String>) -> Result<GreetResponse> {
        let url = format!("{}{HTTP_HELLO_PATH}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&GreetRequest::new(name))
            .send()
            .await
            .map_err(|e| GreeterError::Http(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GreeterError::Http(format!("failed to read response from {url}: {e}")))?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        // Gateway errors carry the gRPC code; anything else is reported by HTTP status.
        match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(err) => Err(GreeterError::Rpc {
                code: tonic::Code::from(err.code),
                message: err.message,
            }),
            Err(_) => Err(GreeterError::Http(format!("{url} returned {status}"))),
        }
    }
}
