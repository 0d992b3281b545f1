//! JSON-RPC 2.0 envelopes exchanged with the Zcash node

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcFailure;

pub const JSONRPC_VERSION: &str = "2.0";

/// Outbound request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Error object carried in a response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Inbound response envelope
///
/// Some gateways omit `jsonrpc` and echo the id as a string, so both are lenient here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
            id: Some(id),
        }
    }

    /// A non-null `error` wins over any `result`; a missing result is `null`.
    pub fn into_result(self) -> Result<Value, RpcFailure> {
        match self.error {
            Some(err) => Err(RpcFailure::Rpc {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
