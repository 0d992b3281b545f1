//! Status and result of asynchronous node operations (z_sendmany)

use axum::extract::State;
use serde_json::Value;
use std::sync::Arc;

use super::{ok, ApiResult, PathParam};
use crate::{error::ApiError, params::required_str, AppState};

/// GET /operation/{opid}/status
pub async fn operation_status_handler(
    State(state): State<Arc<AppState>>,
    PathParam(operation_id): PathParam,
) -> ApiResult {
    let operation_id = required_str(Some(operation_id.as_str()), "operation id")?;
    let statuses = state.rpc.z_get_operation_status(operation_id).await?;

    ok(first_entry(statuses, operation_id)?)
}

/// GET /operation/{opid}/result
pub async fn operation_result_handler(
    State(state): State<Arc<AppState>>,
    PathParam(operation_id): PathParam,
) -> ApiResult {
    let operation_id = required_str(Some(operation_id.as_str()), "operation id")?;
    let results = state.rpc.z_get_operation_result(operation_id).await?;

    ok(first_entry(results, operation_id)?)
}

/// The node answers with a list filtered to the requested id.
fn first_entry(entries: Value, operation_id: &str) -> Result<Value, ApiError> {
    match entries {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found(format!("Operation not found: {}", operation_id))),
        other => Ok(other),
    }
}
