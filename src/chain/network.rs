//! Network identity resolution and explorer links.

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;

use crate::chain::types::{ChainError, ChainResult};
use crate::config::schema::NetworkConfig;

/// Resolved network metadata: where the factory lives and where users can
/// inspect transactions.
#[derive(Debug, Clone)]
pub struct NetworkHandle {
    pub name: String,
    pub factory_address: Address,
    explorer_base: String,
}

impl NetworkHandle {
    pub fn new(name: impl Into<String>, factory_address: Address, explorer_url: &str) -> Self {
        let explorer_base = if explorer_url.ends_with('/') {
            explorer_url.to_string()
        } else {
            format!("{explorer_url}/")
        };
        Self {
            name: name.into(),
            factory_address,
            explorer_base,
        }
    }

    /// Public explorer URL for a transaction.
    pub fn explorer_link(&self, tx_hash: &TxHash) -> String {
        format!("{}tx/{}", self.explorer_base, tx_hash)
    }
}

/// Async accessor for the active network's metadata.
#[async_trait]
pub trait NetworkSource: Send + Sync {
    async fn resolve(&self) -> ChainResult<NetworkHandle>;
}

/// Config-backed network source.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    handle: NetworkHandle,
}

impl NetworkRegistry {
    pub fn from_config(config: &NetworkConfig) -> ChainResult<Self> {
        let factory_address: Address = config
            .campaign_factory_address
            .parse()
            .map_err(|_| ChainError::InvalidAddress(config.campaign_factory_address.clone()))?;
        Ok(Self {
            handle: NetworkHandle::new(&config.name, factory_address, &config.explorer_url),
        })
    }

    pub fn handle(&self) -> &NetworkHandle {
        &self.handle
    }
}

#[async_trait]
impl NetworkSource for NetworkRegistry {
    async fn resolve(&self) -> ChainResult<NetworkHandle> {
        Ok(self.handle.clone())
    }
}
