//! gRPC status → HTTP response translation.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tonic::{Code, Status};

use crate::types::ErrorBody;

/// A failed gateway request, carried as a gRPC code plus message.
#[derive(Debug, Clone)]
pub struct GatewayError {
    code: Code,
    status: StatusCode,
    message: String,
}

impl GatewayError {
    /// An error answered with the HTTP status mapped from `code`.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            status: http_status(code),
            message: message.into(),
        }
    }

    /// Request body that is not valid JSON for the target message.
    pub fn invalid_body(err: serde_json::Error) -> Self {
        Self::new(Code::InvalidArgument, format!("invalid request body: {err}"))
    }

    /// Query string that does not decode into the target message.
    pub fn invalid_query(err: QueryRejection) -> Self {
        Self::new(Code::InvalidArgument, err.body_text())
    }

    pub fn not_found() -> Self {
        Self::new(Code::NotFound, "Not Found")
    }

    /// Known path, wrong HTTP method: 405 with `Unimplemented` in the body.
    pub fn method_not_allowed() -> Self {
        Self {
            code: Code::Unimplemented,
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "Method Not Allowed".to_string(),
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    /// HTTP status the error is answered with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Status> for GatewayError {
    fn from(status: Status) -> Self {
        Self::new(status.code(), status.message())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code as i32,
            message: self.message,
            details: Vec::new(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// HTTP status the gateway answers with for a gRPC code.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        // Client Closed Request, nginx's non-standard code.
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
        Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::BAD_REQUEST,
        Code::Aborted => StatusCode::CONFLICT,
        Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
    }
}
