//! Types shared between the REST gateway and its test tooling.

pub mod envelope;
pub mod error;
pub mod jsonrpc;

pub use envelope::ApiResponse;
pub use error::RpcFailure;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
