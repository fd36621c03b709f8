//! Data-access gateway for a crowdfunding application: campaigns, milestones,
//! and donations mapped onto a remote store and a campaign-factory contract.

pub mod chain;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod observability;
pub mod reporting;
pub mod store;

pub use config::{load_config, GatewayConfig};
pub use error::GatewayError;
pub use gateway::{CampaignGateway, PageRequest, SaveOutcome, Subscription, TxEvent, TxEvents};
pub use models::{Campaign, CampaignStatus, Donation, MilestoneStatus, RecordId};
pub use store::{HttpStore, MemoryStore, Page, Query, Store};
