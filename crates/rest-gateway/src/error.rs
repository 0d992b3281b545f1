//! Handler-level error reporting

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_common::{ApiResponse, RpcFailure};
use tracing::error;

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::err(self.message))).into_response()
    }
}

/// Upstream failures: transport problems map to 502, node-reported errors to 500.
impl From<RpcFailure> for ApiError {
    fn from(failure: RpcFailure) -> Self {
        error!("Upstream call failed: {}", failure);

        let status = match failure {
            RpcFailure::Network(_) => StatusCode::BAD_GATEWAY,
            RpcFailure::Rpc { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError::new(status, failure.to_string())
    }
}
