//! Transaction lookup, listing and sending

use axum::{
    body::Bytes,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{json, Number, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{ok, parse_body, ApiResult, PathParam};
use crate::{
    error::ApiError,
    params::{bool_flag, int_or_default, required_str, Param},
    AppState,
};

/// Body of POST /transaction/send
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    pub address: Option<String>,
    pub amount: Option<Value>,
    pub comment: Option<String>,
}

/// Body of POST /transaction/shielded/send
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldedSendRequest {
    pub from_address: Option<String>,
    pub address: Option<String>,
    pub amount: Option<Value>,
    pub memo: Option<String>,
    pub min_confirmations: Option<i64>,
}

/// GET /transaction/{txid}
pub async fn transaction_handler(
    State(state): State<Arc<AppState>>,
    PathParam(txid): PathParam,
) -> ApiResult {
    let txid = required_str(Some(txid.as_str()), "txid")?;
    ok(state.rpc.get_transaction(txid).await?)
}

/// GET /transactions?count=10&skip=0
pub async fn list_transactions_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let count = int_or_default(&query, Param::Count);
    let skip = int_or_default(&query, Param::Skip);

    let transactions = state.rpc.list_transactions(count, skip).await?;

    ok(json!({
        "transactions": transactions,
        "count": count,
        "skip": skip,
    }))
}

/// GET /transaction/{txid}/raw?verbose=false
pub async fn raw_transaction_handler(
    State(state): State<Arc<AppState>>,
    PathParam(txid): PathParam,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let txid = required_str(Some(txid.as_str()), "txid")?;
    let verbose = bool_flag(&query, "verbose");

    ok(state.rpc.get_raw_transaction(txid, verbose).await?)
}

/// POST /transaction/send
///
/// Only presence is checked here; the node decides whether the address and
/// amount are acceptable.
pub async fn send_handler(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request: SendRequest = parse_body(&body)?;

    let address = required_str(request.address.as_deref(), "address")?;
    let amount = amount_value(request.amount)?;
    let comment = request
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    info!("Sending {} to {}", amount, address);

    let txid = state.rpc.send_to_address(address, amount, comment).await?;
    info!("Transaction broadcast: {}", txid);

    ok(json!({ "txid": txid }))
}

/// POST /transaction/shielded/send
///
/// Returns the node's operation id; callers poll `/operation/{opid}/status`.
pub async fn shielded_send_handler(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request: ShieldedSendRequest = parse_body(&body)?;

    let from_address = required_str(request.from_address.as_deref(), "fromAddress")?;
    let address = required_str(request.address.as_deref(), "address")?;
    let amount = amount_value(request.amount)?;
    let min_confirmations = request
        .min_confirmations
        .unwrap_or(Param::MinConfirmations.default_value());

    let mut recipient = json!({ "address": address, "amount": amount });
    if let Some(memo) = request.memo.as_deref().filter(|m| !m.is_empty()) {
        recipient["memo"] = json!(memo);
    }

    info!("Queueing shielded send from {} to {}", from_address, address);

    let operation_id = state
        .rpc
        .z_send_many(from_address, vec![recipient], min_confirmations)
        .await?;

    ok(json!({ "operationId": operation_id }))
}

/// Accept a JSON number or a numeric string and forward it as a number.
fn amount_value(amount: Option<Value>) -> Result<Value, ApiError> {
    match amount {
        Some(Value::Number(n)) => Ok(Value::Number(n)),
        Some(Value::String(s)) if !s.trim().is_empty() => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid amount: {}", s))),
        _ => Err(ApiError::bad_request("amount is required")),
    }
}
