//! Network, mining, mempool and fee endpoints

use axum::extract::{Query, State};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ok, ApiResult};
use crate::{
    params::{int_or_default, Param},
    AppState,
};

/// GET /network/info
pub async fn network_info_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    ok(state.rpc.get_network_info().await?)
}

/// GET /network/connections
pub async fn connections_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let connections = state.rpc.get_connection_count().await?;
    ok(json!({ "connections": connections }))
}

/// GET /mining/info
pub async fn mining_info_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    ok(state.rpc.get_mining_info().await?)
}

/// GET /mempool/info
pub async fn mempool_info_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    ok(state.rpc.get_mempool_info().await?)
}

/// GET /fee/estimate?nblocks=6
pub async fn fee_estimate_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let nblocks = int_or_default(&query, Param::NBlocks);
    let fee_rate = state.rpc.estimate_fee(nblocks).await?;

    ok(json!({ "feeRate": fee_rate, "nblocks": nblocks }))
}
