//! Chain state: info, height, block hashes and blocks

use axum::extract::{Query, State};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{ok, ApiResult, PathParam};
use crate::{
    error::ApiError,
    params::{int_or_default, required_str, Param},
    AppState,
};

/// GET /blockchain/info
pub async fn blockchain_info_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    ok(state.rpc.get_blockchain_info().await?)
}

/// GET /blockchain/blockcount
pub async fn block_count_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let block_count = state.rpc.get_block_count().await?;
    ok(json!({ "blockCount": block_count }))
}

/// GET /blockchain/blockhash/{height}
pub async fn block_hash_handler(
    State(state): State<Arc<AppState>>,
    PathParam(height): PathParam,
) -> ApiResult {
    let height = required_str(Some(height.as_str()), "height")?;
    let height: i64 = height
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid block height: {}", height)))?;

    let block_hash = state.rpc.get_block_hash(height).await?;
    ok(json!({ "height": height, "blockHash": block_hash }))
}

/// GET /blockchain/block/{blockhash}?verbosity=1
pub async fn block_handler(
    State(state): State<Arc<AppState>>,
    PathParam(block_hash): PathParam,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    let block_hash = required_str(Some(block_hash.as_str()), "blockhash")?;
    let verbosity = int_or_default(&query, Param::Verbosity);

    info!("Fetching block {} (verbosity {})", block_hash, verbosity);

    ok(state.rpc.get_block(block_hash, verbosity).await?)
}
