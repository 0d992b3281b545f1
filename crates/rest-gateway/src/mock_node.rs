//! Mock Zcash node for development and testing
//!
//! Serves the JSON-RPC methods the gateway uses with deterministic,
//! shape-correct results, without requiring a real node or hosted gateway.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use gateway_common::{JsonRpcRequest, JsonRpcResponse};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::rpc_client::CREDENTIAL_HEADER;

/// Chain height the mock reports
pub const MOCK_BLOCK_COUNT: i64 = 2_500_000;

/// Most recent requests kept for inspection
pub const REQUEST_LOG_CAPACITY: usize = 256;

const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMETER: i64 = -8;
const INVALID_ADDRESS_OR_KEY: i64 = -5;
const TYPE_ERROR: i64 = -3;

/// Mock Zcash node
pub struct MockNode {
    /// Credential the node insists on, if any
    expected_credential: Option<String>,

    /// Counter behind generated addresses, txids and operation ids
    sequence: AtomicU64,

    /// Total RPC calls received
    calls: AtomicU64,

    /// Most recent requests, oldest first, bounded by [`REQUEST_LOG_CAPACITY`]
    requests: Mutex<VecDeque<JsonRpcRequest>>,
}

impl MockNode {
    /// Create a new mock node that accepts any credential
    pub fn new() -> Self {
        Self {
            expected_credential: None,
            sequence: AtomicU64::new(1),
            calls: AtomicU64::new(0),
            requests: Mutex::new(VecDeque::with_capacity(REQUEST_LOG_CAPACITY)),
        }
    }

    /// Create a mock node that rejects calls without the given credential
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            expected_credential: Some(credential.into()),
            ..Self::new()
        }
    }

    /// Bind on an ephemeral localhost port and serve in the background
    pub async fn spawn(self) -> Result<(SocketAddr, Arc<MockNode>)> {
        let node = Arc::new(self);
        let app = Router::new()
            .route("/", post(rpc_handler))
            .with_state(node.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind mock node")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Mock node error: {:#}", e);
            }
        });

        info!("Mock Zcash node listening on http://{}", addr);

        Ok((addr, node))
    }

    /// Number of RPC calls received so far
    pub async fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed) as usize
    }

    /// Snapshot of the most recent requests, oldest first
    pub async fn requests(&self) -> Vec<JsonRpcRequest> {
        self.requests.lock().await.iter().cloned().collect()
    }

    async fn record(&self, request: &JsonRpcRequest) {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let mut log = self.requests.lock().await;
        if log.len() == REQUEST_LOG_CAPACITY {
            log.pop_front();
        }
        log.push_back(request.clone());
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Answer a single request
    pub fn dispatch(&self, request: &JsonRpcRequest) -> std::result::Result<Value, (i64, String)> {
        let params = &request.params;
        debug!("Mock node: {}({:?})", request.method, params);

        match request.method.as_str() {
            "getblockchaininfo" => Ok(json!({
                "chain": "main",
                "blocks": MOCK_BLOCK_COUNT,
                "headers": MOCK_BLOCK_COUNT,
                "bestblockhash": block_hash(MOCK_BLOCK_COUNT),
                "difficulty": 72_582_397.31,
                "verificationprogress": 0.9999,
                "chainwork": format!("{:064x}", MOCK_BLOCK_COUNT * 1_000),
                "pruned": false,
                "commitments": 0,
                "valuePools": [
                    { "id": "transparent", "monitored": true, "chainValue": 5_000_000.0 },
                    { "id": "sapling", "monitored": true, "chainValue": 1_000_000.0 },
                    { "id": "orchard", "monitored": true, "chainValue": 750_000.0 }
                ]
            })),
            "getblockcount" => Ok(json!(MOCK_BLOCK_COUNT)),
            "getblockhash" => {
                let height = int_param(params, 0).unwrap_or(-1);
                if !(0..=MOCK_BLOCK_COUNT).contains(&height) {
                    return Err((INVALID_PARAMETER, "Block height out of range".to_string()));
                }
                Ok(json!(block_hash(height)))
            }
            "getblock" => {
                let hash = str_param(params, 0).unwrap_or_default();
                if !is_hex_hash(hash) {
                    return Err((INVALID_ADDRESS_OR_KEY, "Block not found".to_string()));
                }
                match int_param(params, 1).unwrap_or(1) {
                    0 => Ok(json!(format!("04000000{}", hash))),
                    _ => Ok(json!({
                        "hash": hash,
                        "confirmations": 12,
                        "height": MOCK_BLOCK_COUNT - 11,
                        "version": 4,
                        "time": 1_700_000_000,
                        "tx": [format!("{:064x}", 1)]
                    })),
                }
            }
            "getwalletinfo" => Ok(json!({
                "walletversion": 60000,
                "balance": 1.25,
                "unconfirmed_balance": 0.0,
                "immature_balance": 0.0,
                "txcount": 3,
                "keypoololdest": 1_700_000_000,
                "keypoolsize": 100,
                "paytxfee": 0.0
            })),
            "getbalance" => Ok(json!(1.25)),
            "getnewaddress" => Ok(json!(format!("tmMock{:029}", self.next_sequence()))),
            "listunspent" => Ok(json!([{
                "txid": format!("{:064x}", 2),
                "vout": 0,
                "generated": false,
                "address": "tmMockUnspentAddress0000000000000",
                "amount": 1.25,
                "confirmations": 42,
                "spendable": true
            }])),
            "gettransaction" => {
                let txid = str_param(params, 0).unwrap_or_default();
                if !is_hex_hash(txid) {
                    return Err((
                        INVALID_ADDRESS_OR_KEY,
                        "Invalid or non-wallet transaction id".to_string(),
                    ));
                }
                Ok(json!({
                    "txid": txid,
                    "amount": 0.5,
                    "confirmations": 7,
                    "time": 1_700_000_000,
                    "details": [{ "category": "receive", "amount": 0.5, "vout": 0 }]
                }))
            }
            "listtransactions" => {
                let count = int_param(params, 1).unwrap_or(10).clamp(0, 5);
                let skip = int_param(params, 2).unwrap_or(0).max(0);
                let txs: Vec<Value> = (0..count)
                    .map(|i| {
                        json!({
                            "txid": format!("{:064x}", skip + i + 100),
                            "category": "receive",
                            "amount": 0.1,
                            "confirmations": 10 + i
                        })
                    })
                    .collect();
                Ok(Value::Array(txs))
            }
            "getrawtransaction" => {
                let txid = str_param(params, 0).unwrap_or_default();
                if !is_hex_hash(txid) {
                    return Err((
                        INVALID_ADDRESS_OR_KEY,
                        "No information available about transaction".to_string(),
                    ));
                }
                match int_param(params, 1).unwrap_or(0) {
                    0 => Ok(json!(format!("0400008085202f89{}", txid))),
                    _ => Ok(json!({
                        "txid": txid,
                        "version": 5,
                        "vin": [],
                        "vout": [],
                        "confirmations": 7
                    })),
                }
            }
            "sendtoaddress" => {
                let address = str_param(params, 0).unwrap_or_default();
                if !looks_like_address(address) {
                    return Err((INVALID_ADDRESS_OR_KEY, "Invalid Zcash address".to_string()));
                }
                let amount = params.get(1).and_then(Value::as_f64).unwrap_or(0.0);
                if amount <= 0.0 {
                    return Err((TYPE_ERROR, "Invalid amount for send".to_string()));
                }
                Ok(json!(format!("{:064x}", 0xabc000 + self.next_sequence())))
            }
            "z_sendmany" => {
                let from = str_param(params, 0).unwrap_or_default();
                if !looks_like_address(from) {
                    return Err((INVALID_PARAMETER, "Invalid from address".to_string()));
                }
                Ok(json!(format!("opid-{:032x}", self.next_sequence())))
            }
            "z_getoperationstatus" | "z_getoperationresult" => {
                let ids: Vec<&str> = params
                    .first()
                    .and_then(Value::as_array)
                    .map(|ids| ids.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                let entries: Vec<Value> = ids
                    .into_iter()
                    .filter(|id| id.starts_with("opid-"))
                    .map(|id| {
                        json!({
                            "id": id,
                            "status": "success",
                            "creation_time": 1_700_000_000,
                            "method": "z_sendmany",
                            "result": { "txid": format!("{:064x}", 0xdef) }
                        })
                    })
                    .collect();
                Ok(Value::Array(entries))
            }
            "validateaddress" => {
                let address = str_param(params, 0).unwrap_or_default();
                let valid = looks_like_address(address) && address.starts_with('t');
                if valid {
                    Ok(json!({ "isvalid": true, "address": address, "ismine": false }))
                } else {
                    Ok(json!({ "isvalid": false }))
                }
            }
            "getnetworkinfo" => Ok(json!({
                "version": 5_080_050,
                "subversion": "/MagicBean:5.8.0/",
                "protocolversion": 170_100,
                "connections": 8,
                "networks": [],
                "relayfee": 0.000001
            })),
            "getconnectioncount" => Ok(json!(8)),
            "getmininginfo" => Ok(json!({
                "blocks": MOCK_BLOCK_COUNT,
                "difficulty": 72_582_397.31,
                "networksolps": 9_876_543,
                "chain": "main",
                "generate": false
            })),
            "getmempoolinfo" => Ok(json!({ "size": 4, "bytes": 9_216, "usage": 20_480 })),
            "estimatefee" => Ok(json!(0.0001)),
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        }
    }
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new()
    }
}

async fn rpc_handler(
    State(node): State<Arc<MockNode>>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    if let Some(expected) = &node.expected_credential {
        let presented = headers
            .get(CREDENTIAL_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    }

    node.record(&request).await;

    let id = json!(request.id);
    match node.dispatch(&request) {
        Ok(result) => Json(JsonRpcResponse::success(id, result)).into_response(),
        // zcashd reports RPC errors with HTTP 500
        Err((code, message)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::failure(id, code, message)),
        )
            .into_response(),
    }
}

fn block_hash(height: i64) -> String {
    format!("{:064x}", height)
}

fn int_param(params: &[Value], index: usize) -> Option<i64> {
    params.get(index).and_then(Value::as_i64)
}

fn str_param(params: &[Value], index: usize) -> Option<&str> {
    params.get(index).and_then(Value::as_str)
}

fn is_hex_hash(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn looks_like_address(s: &str) -> bool {
    s.len() >= 20
        && (s.starts_with('t') || s.starts_with('u') || s.starts_with("zs"))
        && s.chars().all(|c| c.is_ascii_alphanumeric())
}
