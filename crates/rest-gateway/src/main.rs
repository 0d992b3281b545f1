//! Zcash REST Gateway
//!
//! Main entry point for the REST-to-JSON-RPC translation service.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zcash_rest_gateway::{create_router, AppState, Config, MockNode, RpcClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zcash_rest_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Zcash REST Gateway");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded");
    info!("  API address: {}", config.api_address());
    info!("  Mock mode: {}", config.mock_mode);
    info!("  RPC timeout: {}s", config.rpc_timeout_secs);

    // Resolve the upstream node
    let rpc_url = match (&config.rpc_url, config.mock_mode) {
        (_, true) => {
            let (addr, _node) = MockNode::new().spawn().await?;
            format!("http://{}", addr)
        }
        (Some(url), false) => url.clone(),
        (None, false) => anyhow::bail!("ZCASH_RPC_URL is required when MOCK_MODE=false"),
    };
    info!("  RPC endpoint: {}", rpc_url);

    let rpc = RpcClient::new(rpc_url, config.rpc_api_key.clone(), config.rpc_timeout())
        .context("Failed to build RPC client")?;

    // Create router
    let app = create_router(AppState::new(rpc, config.api_key.clone()));

    // Bind and serve
    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Zcash REST Gateway running on http://{}", config.api_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down Zcash REST Gateway");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Received shutdown signal");
}
