//! Domain models mapped onto the remote store's records.
//!
//! # Data Flow
//! ```text
//! raw store record (JSON)
//!     → from_record (normalize, validate)
//!     → domain value (Campaign, Donation)
//!     → to_record (serialize for create/patch)
//! ```
//!
//! # Design Decisions
//! - The store is authoritative; models are plain values with no behavior
//!   beyond record mapping
//! - Milestones are listed as raw records, so only their status enum lives here

pub mod campaign;
pub mod donation;
pub mod milestone;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use campaign::{Campaign, CampaignStatus};
pub use donation::Donation;
pub use milestone::MilestoneStatus;

/// Errors raised while mapping raw store records into domain values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Record lacks a field the model requires.
    #[error("record is missing field `{0}`")]
    MissingField(&'static str),

    /// Record exists but does not deserialize into the model.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Extract the store-assigned `_id` from a raw record.
pub fn record_id(record: &Value) -> Result<RecordId, ModelError> {
    record
        .get("_id")
        .and_then(Value::as_str)
        .map(RecordId::from)
        .ok_or(ModelError::MissingField("_id"))
}
