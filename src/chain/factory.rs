//! Campaign contract calls.
//!
//! # Responsibilities
//! - Encode factory and instance calls (`newCampaign`, `cancelCampaign`)
//! - Submit them as transactions from a caller-supplied sender
//! - Hand back a pending-call handle: hash now, mined later
//!
//! Call data is encoded with `sol!` call types and sent through a plain
//! `TransactionRequest`; the sender is a node-managed account, so no local
//! signing happens here.

use std::future::Future;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::chain::client::ChainClient;
use crate::chain::types::ChainResult;

sol! {
    /// Factory call deploying a new campaign instance.
    function newCampaign(string name, string url, uint64 parentProject, address reviewer);

    /// Cancels a deployed campaign instance.
    function cancelCampaign();
}

/// A submitted contract call: the hash is known, mining is still in flight.
pub struct PendingCall {
    tx_hash: TxHash,
    mined: BoxFuture<'static, ChainResult<u64>>,
}

impl PendingCall {
    pub fn new(
        tx_hash: TxHash,
        mined: impl Future<Output = ChainResult<u64>> + Send + 'static,
    ) -> Self {
        Self {
            tx_hash,
            mined: Box::pin(mined),
        }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait until the transaction reaches confirmation depth; returns the
    /// block number it was mined in.
    pub async fn wait_mined(self) -> ChainResult<u64> {
        self.mined.await
    }
}

impl std::fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCall")
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

/// The on-chain factory deploying campaign instances.
#[async_trait]
pub trait CampaignFactory: Send + Sync {
    async fn create_campaign(
        &self,
        title: &str,
        url: &str,
        parent_project: u64,
        reviewer: Address,
        from: Address,
    ) -> ChainResult<PendingCall>;
}

/// Calls against an already-deployed campaign instance.
#[async_trait]
pub trait CampaignContracts: Send + Sync {
    async fn cancel_campaign(&self, contract: Address, from: Address) -> ChainResult<PendingCall>;
}

/// Alloy-backed implementation of both contract surfaces.
#[derive(Debug, Clone)]
pub struct EvmCampaigns {
    client: ChainClient,
    factory_address: Address,
}

impl EvmCampaigns {
    pub fn new(client: ChainClient, factory_address: Address) -> Self {
        Self {
            client,
            factory_address,
        }
    }

    async fn submit(&self, to: Address, from: Address, input: Bytes) -> ChainResult<PendingCall> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(input);
        let tx_hash = self.client.send_transaction(tx).await?;

        let client = self.client.clone();
        let timeout_secs = self.client.config().mined_timeout_secs;
        Ok(PendingCall::new(tx_hash, async move {
            client.wait_mined(tx_hash, timeout_secs).await
        }))
    }
}

#[async_trait]
impl CampaignFactory for EvmCampaigns {
    async fn create_campaign(
        &self,
        title: &str,
        url: &str,
        parent_project: u64,
        reviewer: Address,
        from: Address,
    ) -> ChainResult<PendingCall> {
        let call = newCampaignCall {
            name: title.to_string(),
            url: url.to_string(),
            parentProject: parent_project,
            reviewer,
        };
        tracing::debug!(title = %title, reviewer = %reviewer, "Submitting newCampaign");
        self.submit(self.factory_address, from, call.abi_encode().into())
            .await
    }
}

#[async_trait]
impl CampaignContracts for EvmCampaigns {
    async fn cancel_campaign(&self, contract: Address, from: Address) -> ChainResult<PendingCall> {
        let call = cancelCampaignCall {};
        tracing::debug!(contract = %contract, "Submitting cancelCampaign");
        self.submit(contract, from, call.abi_encode().into()).await
    }
}
