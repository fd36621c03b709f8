//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Remote store endpoint and polling behavior.
    pub store: StoreConfig,

    /// Blockchain RPC settings.
    pub chain: ChainConfig,

    /// Network identity: factory address and explorer base.
    pub network: NetworkConfig,
}

/// Remote store client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the store's REST surface.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Poll interval for watch subscriptions, in milliseconds.
    pub watch_poll_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030".to_string(),
            request_timeout_secs: 10,
            watch_poll_interval_ms: 2_000,
        }
    }
}

/// Blockchain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Primary JSON-RPC endpoint.
    pub rpc_url: String,

    /// Failover endpoints tried in order when the primary is unreachable.
    pub failover_urls: Vec<String>,

    /// Expected chain ID; mismatches are refused.
    pub chain_id: u64,

    /// Per-RPC-call timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block depth required before a transaction counts as mined.
    pub confirmation_blocks: u32,

    /// How long to wait for a submitted transaction to be mined, in seconds.
    pub mined_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            confirmation_blocks: 3,
            mined_timeout_secs: 300,
        }
    }
}

/// Network identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Human-readable network name, used in logs.
    pub name: String,

    /// Deployed campaign factory contract address.
    pub campaign_factory_address: String,

    /// Base URL of the public transaction explorer.
    pub explorer_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "mainnet".to_string(),
            campaign_factory_address: String::new(),
            explorer_url: "https://etherscan.io/".to_string(),
        }
    }
}
