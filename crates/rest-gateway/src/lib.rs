//! Zcash REST Gateway
//!
//! Translates authenticated REST calls into JSON-RPC calls against a hosted
//! Zcash node and reshapes each result into a uniform envelope:
//! `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
//!
//! ## Architecture
//!
//! - `auth`: static API-key gate in front of every route
//! - `handlers`: one handler per endpoint, one RPC call per request
//! - `rpc_client`: JSON-RPC 2.0 client with correlation ids
//! - `params`: defaults for optional numeric parameters
//! - `mock_node`: in-process node for development and tests
//!
//! The service keeps no state of its own; balances, blocks and transactions
//! all live in the remote node.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mock_node;
pub mod params;
pub mod rpc_client;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use error::ApiError;
pub use mock_node::MockNode;
pub use rpc_client::RpcClient;

/// Shared application state
pub struct AppState {
    pub rpc: RpcClient,

    /// Key every inbound request must present
    pub api_key: String,
}

impl AppState {
    pub fn new(rpc: RpcClient, api_key: impl Into<String>) -> Self {
        Self {
            rpc,
            api_key: api_key.into(),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        // Blockchain
        .route(
            "/blockchain/info",
            get(handlers::blockchain::blockchain_info_handler),
        )
        .route(
            "/blockchain/blockcount",
            get(handlers::blockchain::block_count_handler),
        )
        .route(
            "/blockchain/blockhash/{height}",
            get(handlers::blockchain::block_hash_handler),
        )
        .route(
            "/blockchain/block/{blockhash}",
            get(handlers::blockchain::block_handler),
        )
        // Wallet
        .route("/wallet/info", get(handlers::wallet::wallet_info_handler))
        .route("/wallet/balance", get(handlers::wallet::balance_handler))
        .route(
            "/wallet/newaddress",
            post(handlers::wallet::new_address_handler),
        )
        .route("/wallet/unspent", get(handlers::wallet::unspent_handler))
        .route(
            "/address/validate/{address}",
            get(handlers::wallet::validate_address_handler),
        )
        // Transactions
        .route(
            "/transactions",
            get(handlers::transaction::list_transactions_handler),
        )
        .route(
            "/transaction/send",
            post(handlers::transaction::send_handler),
        )
        .route(
            "/transaction/shielded/send",
            post(handlers::transaction::shielded_send_handler),
        )
        .route(
            "/transaction/{txid}",
            get(handlers::transaction::transaction_handler),
        )
        .route(
            "/transaction/{txid}/raw",
            get(handlers::transaction::raw_transaction_handler),
        )
        // Async operations
        .route(
            "/operation/{opid}/status",
            get(handlers::operation::operation_status_handler),
        )
        .route(
            "/operation/{opid}/result",
            get(handlers::operation::operation_result_handler),
        )
        // Network, mining, fees
        .route("/network/info", get(handlers::network::network_info_handler))
        .route(
            "/network/connections",
            get(handlers::network::connections_handler),
        )
        .route("/mining/info", get(handlers::network::mining_info_handler))
        .route("/mempool/info", get(handlers::network::mempool_info_handler))
        .route("/fee/estimate", get(handlers::network::fee_estimate_handler))
        .fallback(handlers::not_found_handler)
        .method_not_allowed_fallback(handlers::method_not_allowed_handler)
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            auth::require_api_key,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}
