//! API request handlers, one per endpoint
//!
//! Each handler validates its own required inputs, issues exactly one RPC
//! call and wraps the result in the success envelope. RPC failures bubble up
//! through [`ApiError`]'s `From<RpcFailure>` conversion.

pub mod blockchain;
pub mod network;
pub mod operation;
pub mod transaction;
pub mod wallet;

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path},
    http::{request::Parts, Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use gateway_common::ApiResponse;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ApiError;

pub type ApiResult = Result<Json<ApiResponse>, ApiError>;

/// Wrap a payload in the success envelope
pub(crate) fn ok(data: Value) -> ApiResult {
    Ok(Json(ApiResponse::ok(data)))
}

/// Single path segment; undecodable segments are reported in the failure envelope.
pub struct PathParam(pub String);

impl<S> FromRequestParts<S> for PathParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<String>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| PathParam(value))
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
    }
}

/// Decode an optional JSON body; an empty body yields the default value.
pub(crate) fn parse_body<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// Health check endpoint
pub async fn health_handler() -> ApiResult {
    ok(json!({
        "status": "healthy",
        "service": "zcash-rest-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    ApiError::not_found(format!("Route not found: {}", uri.path()))
}

pub async fn method_not_allowed_handler(method: Method, uri: Uri) -> impl IntoResponse {
    ApiError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {} not allowed for {}", method, uri.path()),
    )
}
