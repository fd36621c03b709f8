//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! config (RPC URL, factory address, explorer base)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → network.rs (resolve factory address + explorer links)
//!     → factory.rs (encode calls, submit, pending-call handle)
//!     → types.rs (tx lifecycle: Submitted → Confirmed / Failed)
//! ```
//!
//! # Constraints
//! - Senders are node-managed accounts; no keys are held or logged here
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when the chain is unreachable

pub mod client;
pub mod factory;
pub mod network;
pub mod types;

pub use client::ChainClient;
pub use factory::{CampaignContracts, CampaignFactory, EvmCampaigns, PendingCall};
pub use network::{NetworkHandle, NetworkRegistry, NetworkSource};
pub use types::{ChainConfig, ChainError, ChainId, FailureDisposition, TxPhase};
