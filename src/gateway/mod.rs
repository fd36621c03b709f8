//! Campaign data-access façade.
//!
//! # Data Flow
//! ```text
//! caller
//!     → CampaignGateway (request construction, record ↔ model mapping)
//!         → Store       (find / create / patch / watch)
//!         → NetworkSource + CampaignFactory / CampaignContracts (chain calls)
//!         → ErrorReporter (user-visible failures from mutations)
//! ```
//!
//! # Design Decisions
//! - Collaborators are injected; the gateway holds no state of its own and
//!   every call builds fresh requests
//! - One-shot operations return `Result`; subscriptions return a cancellable
//!   handle the caller owns
//! - Chain mutations run as a spawned task driving the tx lifecycle
//!   (`Submitted` → `Confirmed`/`Failed`); unexpected failures go to the
//!   error sink and are swallowed, never retried

pub mod subscription;

use std::sync::Arc;

use alloy::primitives::Address;
use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;

use crate::chain::client::ChainClient;
use crate::chain::factory::{CampaignContracts, CampaignFactory, EvmCampaigns, PendingCall};
use crate::chain::network::{NetworkHandle, NetworkRegistry, NetworkSource};
use crate::chain::types::{FailureDisposition, TxPhase};
use crate::config::schema::GatewayConfig;
use crate::error::GatewayError;
use crate::models::{self, Campaign, CampaignStatus, Donation, MilestoneStatus, RecordId};
use crate::reporting::{ErrorReporter, TracingReporter};
use crate::store::{HttpStore, Page, Query, Store, CAMPAIGNS, DONATIONS, MILESTONES};

pub use subscription::{SaveOutcome, Subscription, TxEvent, TxEvents};

/// Fixed user-facing message for abandoned chain mutations.
const TX_FATAL_MESSAGE: &str = "Something went wrong with the transaction!";
/// Fixed user-facing message when the cancel bookkeeping patch fails.
const CANCEL_PATCH_MESSAGE: &str = "Something went wrong updating the campaign record.";
/// Detail placeholder for failures that happen before a hash exists.
const NO_HASH_FALLBACK: &str = "(no transaction hash observed)";

/// Paging parameters for listings.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub limit: u64,
    pub skip: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { limit: 100, skip: 0 }
    }
}

/// Stateless service object for campaign reads, subscriptions, and chain
/// mutations.
pub struct CampaignGateway {
    store: Arc<dyn Store>,
    network: Arc<dyn NetworkSource>,
    factory: Arc<dyn CampaignFactory>,
    contracts: Arc<dyn CampaignContracts>,
    reporter: Arc<dyn ErrorReporter>,
}

impl CampaignGateway {
    pub fn new(
        store: Arc<dyn Store>,
        network: Arc<dyn NetworkSource>,
        factory: Arc<dyn CampaignFactory>,
        contracts: Arc<dyn CampaignContracts>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            store,
            network,
            factory,
            contracts,
            reporter,
        }
    }

    /// Wire up the production collaborators from configuration: HTTP store,
    /// RPC chain client, config-backed network registry, tracing reporter.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let store = HttpStore::new(&config.store)?;
        let registry = NetworkRegistry::from_config(&config.network)?;
        let client = ChainClient::new(&config.chain).await?;
        let campaigns = EvmCampaigns::new(client, registry.handle().factory_address);
        Ok(Self::new(
            Arc::new(store),
            Arc::new(registry),
            Arc::new(campaigns.clone()),
            Arc::new(campaigns),
            Arc::new(TracingReporter),
        ))
    }

    /// Fetch one campaign by store id.
    pub async fn get(&self, id: &RecordId) -> Result<Campaign, GatewayError> {
        let query = Query::new().eq("_id", id.as_str()).limit(1);
        let page = self.store.find(CAMPAIGNS, &query).await?;
        let record = page
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        Ok(Campaign::from_record(&record)?)
    }

    /// List publicly visible campaigns: positive project id, Active status,
    /// newest first.
    pub async fn campaigns(&self, page: PageRequest) -> Result<Page<Campaign>, GatewayError> {
        let query = Query::new()
            .gt("projectId", 0)
            .eq("status", CampaignStatus::Active.as_str())
            .sort_desc("createdAt")
            .limit(page.limit)
            .skip(page.skip);
        let found = self.store.find(CAMPAIGNS, &query).await?;
        Ok(found.try_map(|record| Campaign::from_record(&record))?)
    }

    /// List a campaign's milestones, newest first, excluding canceled,
    /// proposed, rejected, and pending ones. Records stay raw.
    pub async fn milestones(
        &self,
        campaign_id: &RecordId,
        page: PageRequest,
    ) -> Result<Page, GatewayError> {
        let query = Query::new()
            .eq("campaignId", campaign_id.as_str())
            .nin(
                "status",
                MilestoneStatus::EXCLUDED_FROM_LISTINGS
                    .iter()
                    .map(|status| status.as_str()),
            )
            .sort_desc("createdAt")
            .limit(page.limit)
            .skip(page.skip);
        Ok(self.store.find(MILESTONES, &query).await?)
    }

    /// Subscribe to a campaign's donations, excluding returned ones, with
    /// related type and giver details expanded. Every emission is the full
    /// current set, newest first.
    pub fn subscribe_donations(&self, campaign_id: &RecordId) -> Subscription<Vec<Donation>> {
        let query = Query::new()
            .eq("campaignId", campaign_id.as_str())
            .eq("isReturn", false)
            .sort_desc("createdAt")
            .schema("includeTypeAndGiverDetails");
        let mut watch = self.store.watch(DONATIONS, query);
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            while let Some(emission) = watch.next().await {
                let mapped = emission.map_err(GatewayError::from).and_then(|page| {
                    page.data
                        .iter()
                        .map(Donation::from_record)
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(GatewayError::from)
                });
                if tx.send(mapped).is_err() {
                    break;
                }
            }
        });
        Subscription::new(rx, task)
    }

    /// Subscribe to campaigns where the user is owner or reviewer, paged and
    /// newest first. Each emission keeps the store's total count.
    pub fn subscribe_user_campaigns(
        &self,
        user: Address,
        skip_pages: u64,
        items_per_page: u64,
    ) -> Subscription<Page<Campaign>> {
        let user = user.to_string();
        let query = Query::new()
            .any_of([
                ("ownerAddress", json!(user.clone())),
                ("reviewerAddress", json!(user)),
            ])
            .sort_desc("createdAt")
            .limit(items_per_page)
            .skip(skip_pages * items_per_page);
        let mut watch = self.store.watch(CAMPAIGNS, query);
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            while let Some(emission) = watch.next().await {
                let mapped = emission
                    .map_err(GatewayError::from)
                    .and_then(|page| {
                        page.try_map(|record| Campaign::from_record(&record))
                            .map_err(GatewayError::from)
                    });
                if tx.send(mapped).is_err() {
                    break;
                }
            }
        });
        Subscription::new(rx, task)
    }

    /// Persist a campaign.
    ///
    /// With a store id this is a plain patch and no chain call happens.
    /// Without one, the campaign contract is deployed through the factory:
    /// once the transaction hash is observed the record is created (status
    /// Pending, hash recorded) and `Submitted` is emitted; `Mined` follows
    /// confirmation depth. Unexpected failures reach the error sink; the
    /// known unknown-transaction false negative after a hash is suppressed.
    pub async fn save(
        &self,
        campaign: &Campaign,
        from: Address,
    ) -> Result<SaveOutcome, GatewayError> {
        if let Some(id) = &campaign.id {
            let record = campaign.to_record()?;
            self.store.patch(CAMPAIGNS, id, record).await?;
            tracing::debug!(id = %id, "Campaign updated");
            return Ok(SaveOutcome::Updated);
        }

        let network = self.resolve_network().await?;
        let pending = match self
            .factory
            .create_campaign(&campaign.title, "", 0, campaign.reviewer_address, from)
            .await
        {
            Ok(pending) => pending,
            Err(e) => {
                self.report_fatal(None, &e);
                return Err(e.into());
            }
        };
        let explorer_link = network.explorer_link(&pending.tx_hash());

        let mut draft = campaign.clone();
        draft.tx_hash = Some(pending.tx_hash().to_string());
        draft.status = CampaignStatus::Pending;
        draft.mined = false;
        let record = draft.to_record()?;
        let created = match self.store.create(CAMPAIGNS, record).await {
            Ok(created) => created,
            Err(e) => {
                self.report_fatal(Some(&explorer_link), &e);
                return Err(e.into());
            }
        };
        let record_id = models::record_id(&created)?;
        tracing::info!(
            tx_hash = %pending.tx_hash(),
            record_id = %record_id,
            "Campaign creation submitted"
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let _ = events_tx.send(TxEvent::Submitted {
            explorer_link: explorer_link.clone(),
            record_id: Some(record_id),
        });
        self.track_mined(pending, explorer_link, events_tx);
        Ok(SaveOutcome::Deploying(TxEvents::new(events_rx)))
    }

    /// Cancel a deployed campaign.
    ///
    /// The store record is patched to Canceled (mined=false) before
    /// `Submitted` is emitted; a failed patch is reported as a warning and
    /// the flow continues to confirmation. Failure handling matches `save`.
    pub async fn cancel(
        &self,
        campaign: &Campaign,
        from: Address,
    ) -> Result<TxEvents, GatewayError> {
        let id = campaign.id.clone().ok_or(GatewayError::MissingRecordId)?;
        let address = campaign.address.ok_or(GatewayError::MissingAddress)?;

        let network = self.resolve_network().await?;
        let pending = match self.contracts.cancel_campaign(address, from).await {
            Ok(pending) => pending,
            Err(e) => {
                self.report_fatal(None, &e);
                return Err(e.into());
            }
        };
        let explorer_link = network.explorer_link(&pending.tx_hash());
        tracing::info!(id = %id, tx_hash = %pending.tx_hash(), "Campaign cancellation submitted");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let bookkeeping = json!({
            "status": CampaignStatus::Canceled.as_str(),
            "mined": false,
        });
        match self.store.patch(CAMPAIGNS, &id, bookkeeping).await {
            Ok(_) => {
                let _ = events_tx.send(TxEvent::Submitted {
                    explorer_link: explorer_link.clone(),
                    record_id: None,
                });
            }
            Err(e) => {
                self.reporter.warning(CANCEL_PATCH_MESSAGE, &e.to_string());
            }
        }
        self.track_mined(pending, explorer_link, events_tx);
        Ok(TxEvents::new(events_rx))
    }

    async fn resolve_network(&self) -> Result<NetworkHandle, GatewayError> {
        match self.network.resolve().await {
            Ok(handle) => Ok(handle),
            Err(e) => {
                self.report_fatal(None, &e);
                Err(e.into())
            }
        }
    }

    /// Drive a submitted call to settlement on a spawned task.
    fn track_mined(
        &self,
        pending: PendingCall,
        explorer_link: String,
        events: mpsc::UnboundedSender<TxEvent>,
    ) {
        let reporter = Arc::clone(&self.reporter);
        tokio::spawn(async move {
            let tx_hash = pending.tx_hash();
            let submitted = TxPhase::Submitted { tx_hash };
            let settled = match pending.wait_mined().await {
                Ok(block_number) => TxPhase::Confirmed {
                    tx_hash,
                    block_number,
                },
                Err(e) => match FailureDisposition::classify(&e, submitted.hash_seen()) {
                    FailureDisposition::Suppress => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            error = %e,
                            "Ignoring false-negative failure for submitted transaction"
                        );
                        return;
                    }
                    FailureDisposition::Report => TxPhase::Failed {
                        detail: fatal_detail(Some(&explorer_link), &e),
                    },
                },
            };
            match settled {
                TxPhase::Confirmed { block_number, .. } => {
                    tracing::info!(tx_hash = %tx_hash, block_number, "Transaction mined");
                    let _ = events.send(TxEvent::Mined { explorer_link });
                }
                TxPhase::Failed { detail } => {
                    reporter.fatal(TX_FATAL_MESSAGE, &detail);
                }
                // Settlement always leaves the submitted phase
                TxPhase::Submitted { .. } => {}
            }
        });
    }

    fn report_fatal(&self, explorer_link: Option<&str>, error: &dyn std::fmt::Display) {
        self.reporter
            .fatal(TX_FATAL_MESSAGE, &fatal_detail(explorer_link, error));
    }
}

fn fatal_detail(explorer_link: Option<&str>, error: &dyn std::fmt::Display) -> String {
    let link = explorer_link.unwrap_or(NO_HASH_FALLBACK);
    format!("{link} {error}")
}
