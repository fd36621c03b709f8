//! Chain-specific types, errors, and the transaction lifecycle.

use alloy::primitives::TxHash;
use thiserror::Error;

// Re-export ChainConfig from the config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node refused the transaction at submission.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Transaction was not mined within the configured window.
    #[error("transaction not mined after {0} seconds")]
    MinedTimeout(u64),

    /// Transaction was reverted on-chain.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// Chain configuration mismatch.
    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Address string did not parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Lifecycle of a submitted contract call.
///
/// Transitions: hash observed → `Submitted`, receipt confirmed → `Confirmed`,
/// anything else → `Failed`. Whether a failure actually reaches the user is
/// decided by [`FailureDisposition::classify`], which guards the `Failed`
/// transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPhase {
    /// The node accepted the transaction and returned its hash.
    Submitted { tx_hash: TxHash },
    /// The transaction was mined with the required confirmation depth.
    Confirmed { tx_hash: TxHash, block_number: u64 },
    /// The call failed and the failure was judged reportable.
    Failed { detail: String },
}

impl TxPhase {
    /// Whether a transaction hash has been observed in this phase.
    pub fn hash_seen(&self) -> bool {
        matches!(self, TxPhase::Submitted { .. } | TxPhase::Confirmed { .. })
    }
}

/// What to do with a failed chain call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Known false negative; the transaction is assumed valid on-chain.
    Suppress,
    /// Surface to the user through the error reporting sink.
    Report,
}

impl FailureDisposition {
    /// Some chain clients mis-report a freshly submitted transaction as
    /// unknown while it sits in the mempool. Once a hash has been observed,
    /// that specific failure is a false negative and must not reach the user.
    pub fn classify(error: &ChainError, hash_seen: bool) -> Self {
        if hash_seen && error.to_string().contains("unknown transaction") {
            FailureDisposition::Suppress
        } else {
            FailureDisposition::Report
        }
    }
}
