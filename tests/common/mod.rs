//! Shared test doubles for gateway integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;

use campaign_gateway::chain::types::ChainResult;
use campaign_gateway::chain::{
    CampaignContracts, CampaignFactory, ChainError, NetworkHandle, NetworkSource, PendingCall,
};
use campaign_gateway::reporting::ErrorReporter;
use campaign_gateway::{CampaignGateway, MemoryStore};

pub fn test_network() -> NetworkHandle {
    NetworkHandle::new("testnet", Address::repeat_byte(0xFA), "https://etherscan.io/")
}

/// Network source resolving to a fixed handle.
pub struct StaticNetwork(pub NetworkHandle);

#[async_trait]
impl NetworkSource for StaticNetwork {
    async fn resolve(&self) -> ChainResult<NetworkHandle> {
        Ok(self.0.clone())
    }
}

/// Network source whose resolution always fails.
pub struct FailingNetwork;

#[async_trait]
impl NetworkSource for FailingNetwork {
    async fn resolve(&self) -> ChainResult<NetworkHandle> {
        Err(ChainError::Rpc("network resolution failed".to_string()))
    }
}

/// How the scripted chain behaves for every submitted call.
#[derive(Debug, Clone, Copy)]
pub enum ChainScript {
    /// Hash observed, then mined.
    MineAfterHash,
    /// Submission itself is refused; no hash ever exists.
    FailBeforeHash,
    /// Hash observed, then the client mis-reports the tx as unknown.
    UnknownTxAfterHash,
    /// Hash observed, then a genuine on-chain failure.
    FailAfterHash,
}

/// In-process stand-in for the factory and deployed campaign contracts.
pub struct ScriptedChain {
    script: ChainScript,
    pub tx_hash: TxHash,
    pub create_calls: AtomicUsize,
    /// (title, reviewer, from) per factory call.
    pub created: Mutex<Vec<(String, Address, Address)>>,
    /// (contract, from) per cancel call.
    pub canceled: Mutex<Vec<(Address, Address)>>,
}

impl ScriptedChain {
    pub fn new(script: ChainScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            tx_hash: TxHash::repeat_byte(0xAB),
            create_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            canceled: Mutex::new(Vec::new()),
        })
    }

    fn pending(&self) -> ChainResult<PendingCall> {
        let tx_hash = self.tx_hash;
        match self.script {
            ChainScript::FailBeforeHash => {
                Err(ChainError::Rejected("insufficient funds for gas".to_string()))
            }
            ChainScript::MineAfterHash => Ok(PendingCall::new(tx_hash, async { Ok(7) })),
            ChainScript::UnknownTxAfterHash => Ok(PendingCall::new(tx_hash, async {
                Err(ChainError::Rpc(
                    "Returned error: unknown transaction".to_string(),
                ))
            })),
            ChainScript::FailAfterHash => Ok(PendingCall::new(tx_hash, async {
                Err(ChainError::Reverted("out of gas".to_string()))
            })),
        }
    }
}

#[async_trait]
impl CampaignFactory for ScriptedChain {
    async fn create_campaign(
        &self,
        title: &str,
        _url: &str,
        _parent_project: u64,
        reviewer: Address,
        from: Address,
    ) -> ChainResult<PendingCall> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap()
            .push((title.to_string(), reviewer, from));
        self.pending()
    }
}

#[async_trait]
impl CampaignContracts for ScriptedChain {
    async fn cancel_campaign(&self, contract: Address, from: Address) -> ChainResult<PendingCall> {
        self.canceled.lock().unwrap().push((contract, from));
        self.pending()
    }
}

/// Reporter that records every call for assertions.
#[derive(Default)]
pub struct CapturingReporter {
    pub fatals: Mutex<Vec<(String, String)>>,
    pub warnings: Mutex<Vec<(String, String)>>,
}

impl ErrorReporter for CapturingReporter {
    fn fatal(&self, message: &str, detail: &str) {
        self.fatals
            .lock()
            .unwrap()
            .push((message.to_string(), detail.to_string()));
    }

    fn warning(&self, message: &str, detail: &str) {
        self.warnings
            .lock()
            .unwrap()
            .push((message.to_string(), detail.to_string()));
    }
}

pub struct Harness {
    pub gateway: CampaignGateway,
    pub store: MemoryStore,
    pub chain: Arc<ScriptedChain>,
    pub reporter: Arc<CapturingReporter>,
}

pub fn harness(script: ChainScript) -> Harness {
    harness_with_network(script, Arc::new(StaticNetwork(test_network())))
}

pub fn harness_with_network(script: ChainScript, network: Arc<dyn NetworkSource>) -> Harness {
    let store = MemoryStore::new();
    let chain = ScriptedChain::new(script);
    let reporter = Arc::new(CapturingReporter::default());
    let gateway = CampaignGateway::new(
        Arc::new(store.clone()),
        network,
        chain.clone(),
        chain.clone(),
        reporter.clone(),
    );
    Harness {
        gateway,
        store,
        chain,
        reporter,
    }
}
