//! Native request/response types.
//!
//! These are the JSON shapes the HTTP gateway speaks. The protobuf messages
//! in [`crate::proto`] are the wire shapes on the gRPC port; conversions live
//! in `crate::convert`.

use serde::{Deserialize, Serialize};

use crate::greeting::greet;

/// A request to greet someone.
///
/// An absent `name` deserializes as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetRequest {
    #[serde(default)]
    pub name: String,
}

impl GreetRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Compute the response for this request.
    pub fn respond(&self) -> GreetResponse {
        GreetResponse {
            message: greet(&self.name),
        }
    }
}

/// The greeting produced for a [`GreetRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetResponse {
    #[serde(default)]
    pub message: String,
}

/// JSON body the HTTP gateway returns for every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric gRPC status code.
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}
