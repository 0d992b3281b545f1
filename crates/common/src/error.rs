use thiserror::Error;

/// Failure raised by a single JSON-RPC call to the upstream node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcFailure {
    /// The call never produced a JSON-RPC envelope (DNS, refused connection, timeout, garbage body).
    #[error("Network error: {0}")]
    Network(String),

    /// The node answered with a non-null `error` field.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl RpcFailure {
    pub fn network(message: impl Into<String>) -> Self {
        RpcFailure::Network(message.into())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, RpcFailure::Network(_))
    }
}
