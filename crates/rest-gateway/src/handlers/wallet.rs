//! Wallet endpoints: info, balance, addresses and unspent outputs

use axum::{
    body::Bytes,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{ok, parse_body, ApiResult, PathParam};
use crate::{
    params::{int_or_default, required_str, Param},
    AppState,
};

/// Optional body of POST /wallet/newaddress
#[derive(Debug, Default, Deserialize)]
pub struct NewAddressRequest {
    pub account: Option<String>,
}

/// GET /wallet/info
pub async fn wallet_info_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    ok(state.rpc.get_wallet_info().await?)
}

/// GET /wallet/balance?minConfirmations=1
pub async fn balance_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let min_confirmations = int_or_default(&query, Param::MinConfirmations);
    let balance = state.rpc.get_balance(min_confirmations).await?;

    ok(json!({
        "balance": balance,
        "minConfirmations": min_confirmations,
    }))
}

/// POST /wallet/newaddress
pub async fn new_address_handler(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let request: NewAddressRequest = parse_body(&body)?;
    let account = request
        .account
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());

    let address = state.rpc.get_new_address(account).await?;
    info!("Generated new wallet address");

    ok(json!({ "address": address }))
}

/// GET /wallet/unspent?minConfirmations=1&maxConfirmations=9999999
pub async fn unspent_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let min_confirmations = int_or_default(&query, Param::MinConfirmations);
    let max_confirmations = int_or_default(&query, Param::MaxConfirmations);

    let unspent = state
        .rpc
        .list_unspent(min_confirmations, max_confirmations)
        .await?;

    ok(json!({
        "unspent": unspent,
        "minConfirmations": min_confirmations,
        "maxConfirmations": max_confirmations,
    }))
}

/// GET /address/validate/{address}
pub async fn validate_address_handler(
    State(state): State<Arc<AppState>>,
    PathParam(address): PathParam,
) -> ApiResult {
    let address = required_str(Some(address.as_str()), "address")?;
    ok(state.rpc.validate_address(address).await?)
}
