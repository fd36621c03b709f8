//! Crate-level error type.

use thiserror::Error;

use crate::chain::types::ChainError;
use crate::models::{ModelError, RecordId};
use crate::store::StoreError;

/// Errors surfaced by gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A lookup by id matched no record.
    #[error("campaign not found: {0}")]
    NotFound(RecordId),

    /// The campaign has no deployed contract address yet.
    #[error("campaign has no deployed contract address")]
    MissingAddress,

    /// The campaign has never been persisted to the store.
    #[error("campaign has no store record id")]
    MissingRecordId,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
