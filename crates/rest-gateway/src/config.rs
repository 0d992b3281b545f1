//! Configuration management for the REST gateway
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Zcash node JSON-RPC endpoint (hosted gateway URL)
    pub rpc_url: Option<String>,

    /// Credential sent to the hosted gateway
    pub rpc_api_key: String,

    /// Static key every inbound request must present
    pub api_key: String,

    /// Transport timeout for each outbound RPC call, in seconds
    pub rpc_timeout_secs: u64,

    /// Whether to serve an in-process mock node (for development/testing)
    pub mock_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            rpc_url: env::var("ZCASH_RPC_URL").ok().filter(|url| !url.trim().is_empty()),

            rpc_api_key: env::var("ZCASH_RPC_API_KEY").unwrap_or_default(),

            api_key: env::var("API_KEY").unwrap_or_default(),

            rpc_timeout_secs: env::var("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid RPC_TIMEOUT_SECS")?,

            mock_mode: env::var("MOCK_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("Invalid MOCK_MODE (expected true/false)")?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.rpc_timeout_secs == 0 {
            anyhow::bail!("RPC_TIMEOUT_SECS must be greater than 0");
        }

        if self.api_key.trim().is_empty() {
            anyhow::bail!("API_KEY is required");
        }

        if !self.mock_mode && self.rpc_url.is_none() {
            anyhow::bail!("ZCASH_RPC_URL is required when MOCK_MODE=false");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}
