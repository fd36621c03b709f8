//! Campaign model and status lifecycle.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ModelError, RecordId};

/// Campaign lifecycle status as stored by the remote service.
///
/// A campaign is persisted as `Pending` before its creation transaction is
/// confirmed, becomes `Active` once confirmed (listings additionally require a
/// positive project id), and may later transition to `Canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    Pending,
    Active,
    Canceled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "Pending",
            CampaignStatus::Active => "Active",
            CampaignStatus::Canceled => "Canceled",
        }
    }
}

/// A crowdfunding campaign.
///
/// `id` is assigned by the store on first persist; `address` exists only once
/// the on-chain creation transaction has been observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Deployed campaign contract address, once the creation tx is observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub image: String,

    pub owner_address: Address,

    pub reviewer_address: Address,

    /// Listings only include campaigns with a positive project id.
    #[serde(default)]
    pub project_id: i64,

    pub status: CampaignStatus,

    /// Hash of the creation transaction, recorded at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,

    /// Whether the creation transaction has been mined. The store is
    /// authoritative for this flag.
    #[serde(default)]
    pub mined: bool,

    #[serde(default = "default_created_at")]
    pub created_at: DateTime<Utc>,
}

fn default_created_at() -> DateTime<Utc> {
    Utc::now()
}

impl Campaign {
    /// Create a client-side draft, not yet persisted or deployed.
    pub fn draft(
        title: impl Into<String>,
        owner_address: Address,
        reviewer_address: Address,
    ) -> Self {
        Self {
            id: None,
            address: None,
            title: title.into(),
            description: String::new(),
            image: String::new(),
            owner_address,
            reviewer_address,
            project_id: 0,
            status: CampaignStatus::Pending,
            tx_hash: None,
            mined: false,
            created_at: Utc::now(),
        }
    }

    /// Normalize a raw store record into a `Campaign`.
    pub fn from_record(record: &Value) -> Result<Self, ModelError> {
        serde_json::from_value(record.clone()).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    /// Serialize for a store create/patch call.
    pub fn to_record(&self) -> Result<Value, ModelError> {
        serde_json::to_value(self).map_err(|e| ModelError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    #[test]
    fn test_draft_defaults() {
        let campaign = Campaign::draft("Clean water", addr(1), addr(2));
        assert!(campaign.id.is_none());
        assert!(campaign.address.is_none());
        assert_eq!(campaign.status, CampaignStatus::Pending);
        assert_eq!(campaign.project_id, 0);
        assert!(!campaign.mined);
    }

    #[test]
    fn test_from_record_round_trip() {
        let mut campaign = Campaign::draft("Clean water", addr(1), addr(2));
        campaign.id = Some(RecordId::from("c1"));
        campaign.status = CampaignStatus::Active;
        campaign.project_id = 7;

        let record = campaign.to_record().unwrap();
        assert_eq!(record["_id"], json!("c1"));
        assert_eq!(record["status"], json!("Active"));
        assert_eq!(record["projectId"], json!(7));

        let parsed = Campaign::from_record(&record).unwrap();
        assert_eq!(parsed.id, Some(RecordId::from("c1")));
        assert_eq!(parsed.status, CampaignStatus::Active);
        assert_eq!(parsed.owner_address, addr(1));
    }

    #[test]
    fn test_from_record_rejects_unknown_status() {
        let record = json!({
            "title": "T",
            "ownerAddress": format!("{:?}", addr(1)),
            "reviewerAddress": format!("{:?}", addr(2)),
            "status": "Launched",
        });
        assert!(Campaign::from_record(&record).is_err());
    }

    #[test]
    fn test_draft_serializes_without_optional_fields() {
        let record = Campaign::draft("T", addr(1), addr(2)).to_record().unwrap();
        assert!(record.get("_id").is_none());
        assert!(record.get("address").is_none());
        assert!(record.get("txHash").is_none());
    }
}
