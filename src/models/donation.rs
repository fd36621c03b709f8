//! Donation model.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ModelError, RecordId};

/// A donation made to a campaign.
///
/// Donation subscriptions ask the store to expand related type and giver
/// details; those arrive as opaque sub-records and are kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(rename = "_id")]
    pub id: RecordId,

    pub campaign_id: RecordId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giver_address: Option<Address>,

    /// Donated amount in wei, as the store's decimal string.
    #[serde(default)]
    pub amount: String,

    #[serde(default)]
    pub token_symbol: Option<String>,

    /// Set when this donation was returned/refunded to the giver.
    #[serde(rename = "isReturn", default)]
    pub returned: bool,

    /// Expanded donation-type details, when the query requested them.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub donation_type: Option<Value>,

    /// Expanded giver details, when the query requested them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub giver: Option<Value>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// Normalize a raw store record into a `Donation`.
    pub fn from_record(record: &Value) -> Result<Self, ModelError> {
        serde_json::from_value(record.clone()).map_err(|e| ModelError::Malformed(e.to_string()))
    }
}
