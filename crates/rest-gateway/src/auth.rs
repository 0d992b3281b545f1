//! Static API-key gate applied to every route

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{error::ApiError, AppState};

/// Header clients put the key in
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests that do not carry the configured key before any handler runs.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let outcome = match presented_key(request.headers()) {
        None => Err(ApiError::unauthorized("Missing API key")),
        Some(key) if keys_match(key, &state.api_key) => Ok(()),
        Some(_) => Err(ApiError::forbidden("Invalid API key")),
    };

    match outcome {
        Ok(()) => next.run(request).await,
        Err(err) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                status = %err.status,
                "Rejected request: {}",
                err.message
            );
            err.into_response()
        }
    }
}

/// `x-api-key` takes precedence; `Authorization: Bearer <key>` is also accepted.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        return value.to_str().ok().map(str::trim);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

fn keys_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
