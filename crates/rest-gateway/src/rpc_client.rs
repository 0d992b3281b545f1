//! JSON-RPC client for the hosted Zcash node
//!
//! Every call gets the next correlation id, is posted as a single JSON-RPC 2.0
//! envelope, and comes back either as the untouched `result` value or as an
//! [`RpcFailure`]. There are no retries; the only time bound is the fixed
//! client timeout.

use gateway_common::{JsonRpcRequest, JsonRpcResponse, RpcFailure};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the gateway credential on outbound calls
pub const CREDENTIAL_HEADER: &str = "x-api-key";

pub type RpcResult = Result<Value, RpcFailure>;

/// Client for the remote node
pub struct RpcClient {
    base_url: String,
    credential: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client with a fixed transport timeout
    pub fn new(
        base_url: impl Into<String>,
        credential: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            credential: credential.into(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Correlation ids are diagnostic only, so a relaxed counter is enough.
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Issue one JSON-RPC call and return its `result` field unchanged
    pub async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult {
        let id = self.next_id();
        let request = JsonRpcRequest::new(id, method, params);

        debug!(id, method, "Sending RPC request");

        let mut builder = self.client.post(&self.base_url).json(&request);
        if !self.credential.is_empty() {
            builder = builder.header(CREDENTIAL_HEADER, &self.credential);
        }

        let response = builder.send().await.map_err(|e| {
            let failure = transport_failure(e);
            warn!(id, method, "RPC transport failure: {}", failure);
            failure
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            let failure = transport_failure(e);
            warn!(id, method, "Failed to read RPC response body: {}", failure);
            failure
        })?;

        // zcashd-style nodes answer errors with HTTP 500 and a normal envelope,
        // so the envelope is checked before the status code.
        let envelope: JsonRpcResponse = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(id, method, %status, "Unparseable RPC response: {}", e);
                return Err(RpcFailure::network(format!(
                    "Unexpected response from node (HTTP {}): {}",
                    status, e
                )));
            }
        };

        if !status.is_success() && envelope.error.is_none() {
            warn!(id, method, %status, "RPC call failed without error payload");
            return Err(RpcFailure::network(format!("Node returned HTTP {}", status)));
        }

        match envelope.into_result() {
            Ok(result) => {
                debug!(id, method, "RPC request succeeded");
                Ok(result)
            }
            Err(failure) => {
                warn!(id, method, "RPC request failed: {}", failure);
                Err(failure)
            }
        }
    }

    // Blockchain

    pub async fn get_blockchain_info(&self) -> RpcResult {
        self.call("getblockchaininfo", vec![]).await
    }

    pub async fn get_block_count(&self) -> RpcResult {
        self.call("getblockcount", vec![]).await
    }

    pub async fn get_block_hash(&self, height: i64) -> RpcResult {
        self.call("getblockhash", vec![json!(height)]).await
    }

    pub async fn get_block(&self, block_hash: &str, verbosity: i64) -> RpcResult {
        self.call("getblock", vec![json!(block_hash), json!(verbosity)])
            .await
    }

    // Wallet

    pub async fn get_wallet_info(&self) -> RpcResult {
        self.call("getwalletinfo", vec![]).await
    }

    pub async fn get_balance(&self, min_confirmations: i64) -> RpcResult {
        self.call("getbalance", vec![json!("*"), json!(min_confirmations)])
            .await
    }

    pub async fn get_new_address(&self, account: Option<&str>) -> RpcResult {
        let params = account.map(|a| vec![json!(a)]).unwrap_or_default();
        self.call("getnewaddress", params).await
    }

    pub async fn list_unspent(&self, min_confirmations: i64, max_confirmations: i64) -> RpcResult {
        self.call(
            "listunspent",
            vec![json!(min_confirmations), json!(max_confirmations)],
        )
        .await
    }

    // Transactions

    pub async fn get_transaction(&self, txid: &str) -> RpcResult {
        self.call("gettransaction", vec![json!(txid)]).await
    }

    pub async fn list_transactions(&self, count: i64, skip: i64) -> RpcResult {
        self.call("listtransactions", vec![json!("*"), json!(count), json!(skip)])
            .await
    }

    pub async fn get_raw_transaction(&self, txid: &str, verbose: bool) -> RpcResult {
        let verbose = if verbose { 1 } else { 0 };
        self.call("getrawtransaction", vec![json!(txid), json!(verbose)])
            .await
    }

    /// Broadcasts a payment. Not idempotent: a transport failure after the
    /// node accepted the call leaves the outcome unknown to the caller.
    pub async fn send_to_address(
        &self,
        address: &str,
        amount: Value,
        comment: Option<&str>,
    ) -> RpcResult {
        let mut params = vec![json!(address), amount];
        if let Some(comment) = comment {
            params.push(json!(comment));
        }
        self.call("sendtoaddress", params).await
    }

    pub async fn z_send_many(
        &self,
        from_address: &str,
        recipients: Vec<Value>,
        min_confirmations: i64,
    ) -> RpcResult {
        self.call(
            "z_sendmany",
            vec![
                json!(from_address),
                Value::Array(recipients),
                json!(min_confirmations),
            ],
        )
        .await
    }

    pub async fn z_get_operation_status(&self, operation_id: &str) -> RpcResult {
        self.call("z_getoperationstatus", vec![json!([operation_id])])
            .await
    }

    pub async fn z_get_operation_result(&self, operation_id: &str) -> RpcResult {
        self.call("z_getoperationresult", vec![json!([operation_id])])
            .await
    }

    // Addresses, network, mining

    pub async fn validate_address(&self, address: &str) -> RpcResult {
        self.call("validateaddress", vec![json!(address)]).await
    }

    pub async fn get_network_info(&self) -> RpcResult {
        self.call("getnetworkinfo", vec![]).await
    }

    pub async fn get_connection_count(&self) -> RpcResult {
        self.call("getconnectioncount", vec![]).await
    }

    pub async fn get_mining_info(&self) -> RpcResult {
        self.call("getmininginfo", vec![]).await
    }

    pub async fn get_mempool_info(&self) -> RpcResult {
        self.call("getmempoolinfo", vec![]).await
    }

    pub async fn estimate_fee(&self, nblocks: i64) -> RpcResult {
        self.call("estimatefee", vec![json!(nblocks)]).await
    }
}

/// reqwest's top-level message omits the cause (refused, timed out, DNS),
/// so the whole source chain goes into the failure.
fn transport_failure(err: reqwest::Error) -> RpcFailure {
    RpcFailure::network(format!("{:#}", anyhow::Error::from(err)))
}
