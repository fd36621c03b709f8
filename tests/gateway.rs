//! End-to-end gateway flows against the in-memory store and a scripted chain.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use alloy::primitives::Address;
use serde_json::{json, Value};

use campaign_gateway::store::Store;
use campaign_gateway::{
    Campaign, CampaignStatus, GatewayError, PageRequest, Query, RecordId, SaveOutcome, TxEvent,
};

use common::{harness, harness_with_network, ChainScript, FailingNetwork};

fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

fn campaign_record(id: &str, project_id: i64, status: &str, created_at: &str) -> Value {
    json!({
        "_id": id,
        "title": format!("Campaign {id}"),
        "ownerAddress": addr(1).to_string(),
        "reviewerAddress": addr(2).to_string(),
        "projectId": project_id,
        "status": status,
        "mined": true,
        "createdAt": created_at,
    })
}

fn donation_record(id: &str, campaign_id: &str, returned: bool, created_at: &str) -> Value {
    json!({
        "_id": id,
        "campaignId": campaign_id,
        "amount": "1000000000000000000",
        "isReturn": returned,
        "createdAt": created_at,
    })
}

// ---- reads -----------------------------------------------------------------

#[tokio::test]
async fn get_resolves_matching_campaign() {
    let h = harness(ChainScript::MineAfterHash);
    h.store
        .create("campaigns", campaign_record("c1", 5, "Active", "2024-01-01T00:00:00Z"))
        .await
        .unwrap();

    let campaign = h.gateway.get(&RecordId::from("c1")).await.unwrap();
    assert_eq!(campaign.id, Some(RecordId::from("c1")));
    assert_eq!(campaign.status, CampaignStatus::Active);
}

#[tokio::test]
async fn get_missing_campaign_is_not_found() {
    let h = harness(ChainScript::MineAfterHash);
    let err = h.gateway.get(&RecordId::from("nope")).await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[tokio::test]
async fn campaigns_lists_only_active_with_project_id() {
    let h = harness(ChainScript::MineAfterHash);
    // 3 qualifying, 2 disqualified (one pending, one canceled)
    for record in [
        campaign_record("c1", 1, "Active", "2024-01-01T00:00:00Z"),
        campaign_record("c2", 2, "Active", "2024-03-01T00:00:00Z"),
        campaign_record("c3", 3, "Active", "2024-02-01T00:00:00Z"),
        campaign_record("c4", 0, "Pending", "2024-04-01T00:00:00Z"),
        campaign_record("c5", 4, "Canceled", "2024-05-01T00:00:00Z"),
    ] {
        h.store.create("campaigns", record).await.unwrap();
    }

    let page = h
        .gateway
        .campaigns(PageRequest { limit: 10, skip: 0 })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    let ids: Vec<&str> = page
        .data
        .iter()
        .map(|c| c.id.as_ref().unwrap().as_str())
        .collect();
    // Newest first
    assert_eq!(ids, vec!["c2", "c3", "c1"]);
    assert!(page
        .data
        .iter()
        .all(|c| c.project_id > 0 && c.status == CampaignStatus::Active));
}

#[tokio::test]
async fn campaigns_excludes_active_without_project_id() {
    let h = harness(ChainScript::MineAfterHash);
    h.store
        .create("campaigns", campaign_record("c1", 0, "Active", "2024-01-01T00:00:00Z"))
        .await
        .unwrap();
    let page = h.gateway.campaigns(PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn milestones_hides_terminal_and_pending_states() {
    let h = harness(ChainScript::MineAfterHash);
    for (id, status) in [
        ("m1", "InProgress"),
        ("m2", "Canceled"),
        ("m3", "Proposed"),
        ("m4", "Rejected"),
        ("m5", "Pending"),
        ("m6", "Completed"),
    ] {
        h.store
            .create(
                "milestones",
                json!({
                    "_id": id,
                    "campaignId": "c1",
                    "status": status,
                    "createdAt": format!("2024-01-0{}T00:00:00Z", id.trim_start_matches('m')),
                }),
            )
            .await
            .unwrap();
    }

    let page = h
        .gateway
        .milestones(&RecordId::from("c1"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    let statuses: Vec<&str> = page
        .data
        .iter()
        .map(|m| m["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["Completed", "InProgress"]);
}

// ---- subscriptions ---------------------------------------------------------

#[tokio::test]
async fn donation_subscription_skips_returned_and_relists_on_change() {
    let h = harness(ChainScript::MineAfterHash);
    h.store
        .create("donations", donation_record("d1", "c1", false, "2024-01-01T00:00:00Z"))
        .await
        .unwrap();
    h.store
        .create("donations", donation_record("d2", "c1", true, "2024-01-02T00:00:00Z"))
        .await
        .unwrap();

    let mut subscription = h.gateway.subscribe_donations(&RecordId::from("c1"));

    let initial = subscription.next().await.unwrap().unwrap();
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].id, RecordId::from("d1"));
    assert!(!initial[0].returned);

    h.store
        .create("donations", donation_record("d3", "c1", false, "2024-01-03T00:00:00Z"))
        .await
        .unwrap();

    let updated = subscription.next().await.unwrap().unwrap();
    assert_eq!(updated.len(), 2);
    // Newest first
    assert_eq!(updated[0].id, RecordId::from("d3"));

    subscription.cancel();
}

#[tokio::test]
async fn user_campaign_subscription_matches_owner_or_reviewer() {
    let h = harness(ChainScript::MineAfterHash);
    let user = addr(7);

    let mut owned = campaign_record("c1", 1, "Active", "2024-01-01T00:00:00Z");
    owned["ownerAddress"] = json!(user.to_string());
    let mut reviewed = campaign_record("c2", 2, "Pending", "2024-02-01T00:00:00Z");
    reviewed["reviewerAddress"] = json!(user.to_string());
    let unrelated = campaign_record("c3", 3, "Active", "2024-03-01T00:00:00Z");

    for record in [owned, reviewed, unrelated] {
        h.store.create("campaigns", record).await.unwrap();
    }

    let mut subscription = h.gateway.subscribe_user_campaigns(user, 0, 10);
    let page = subscription.next().await.unwrap().unwrap();
    assert_eq!(page.total, 2);
    let ids: Vec<&str> = page
        .data
        .iter()
        .map(|c| c.id.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(ids, vec!["c2", "c1"]);
}

// ---- save ------------------------------------------------------------------

#[tokio::test]
async fn save_with_id_patches_store_without_chain_call() {
    let h = harness(ChainScript::MineAfterHash);
    h.store
        .create("campaigns", campaign_record("c1", 5, "Active", "2024-01-01T00:00:00Z"))
        .await
        .unwrap();

    let mut campaign = h.gateway.get(&RecordId::from("c1")).await.unwrap();
    campaign.title = "Renamed".to_string();

    let outcome = h.gateway.save(&campaign, addr(9)).await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Updated));
    assert_eq!(h.chain.create_calls.load(Ordering::SeqCst), 0);

    let reloaded = h.gateway.get(&RecordId::from("c1")).await.unwrap();
    assert_eq!(reloaded.title, "Renamed");
}

#[tokio::test]
async fn save_without_id_deploys_then_confirms() {
    let h = harness(ChainScript::MineAfterHash);
    let draft = Campaign::draft("Clean water", addr(1), addr(2));
    let expected_link = format!("https://etherscan.io/tx/{}", h.chain.tx_hash);

    let outcome = h.gateway.save(&draft, addr(1)).await.unwrap();
    let mut events = match outcome {
        SaveOutcome::Deploying(events) => events,
        SaveOutcome::Updated => panic!("expected a deployment"),
    };

    // Submitted fires first, with the explorer link and the new record id
    let record_id = match events.next().await.unwrap() {
        TxEvent::Submitted {
            explorer_link,
            record_id,
        } => {
            assert_eq!(explorer_link, expected_link);
            record_id.unwrap()
        }
        other => panic!("expected Submitted, got {other:?}"),
    };

    // The pending record carries the transaction hash
    let persisted = h.gateway.get(&record_id).await.unwrap();
    assert_eq!(persisted.status, CampaignStatus::Pending);
    assert_eq!(persisted.tx_hash, Some(h.chain.tx_hash.to_string()));
    assert!(!persisted.mined);

    match events.next().await.unwrap() {
        TxEvent::Mined { explorer_link } => assert_eq!(explorer_link, expected_link),
        other => panic!("expected Mined, got {other:?}"),
    }
    assert!(events.next().await.is_none());
    assert!(h.reporter.fatals.lock().unwrap().is_empty());

    // Factory received the draft's parameters
    let created = h.chain.created.lock().unwrap();
    assert_eq!(created.as_slice(), &[("Clean water".to_string(), addr(2), addr(1))]);
}

#[tokio::test]
async fn save_suppresses_unknown_transaction_after_hash() {
    let h = harness(ChainScript::UnknownTxAfterHash);
    let draft = Campaign::draft("Clean water", addr(1), addr(2));

    let outcome = h.gateway.save(&draft, addr(1)).await.unwrap();
    let mut events = match outcome {
        SaveOutcome::Deploying(events) => events,
        SaveOutcome::Updated => panic!("expected a deployment"),
    };

    assert!(matches!(
        events.next().await.unwrap(),
        TxEvent::Submitted { .. }
    ));
    // The false negative settles the flow silently: no Mined, no report
    assert!(events.next().await.is_none());
    assert!(h.reporter.fatals.lock().unwrap().is_empty());
    assert!(h.reporter.warnings.lock().unwrap().is_empty());
}

#[tokio::test]
async fn save_reports_failure_before_hash() {
    let h = harness(ChainScript::FailBeforeHash);
    let draft = Campaign::draft("Clean water", addr(1), addr(2));

    let err = h.gateway.save(&draft, addr(1)).await.unwrap_err();
    assert!(matches!(err, GatewayError::Chain(_)));

    let fatals = h.reporter.fatals.lock().unwrap();
    assert_eq!(fatals.len(), 1);
    assert!(fatals[0].1.contains("(no transaction hash observed)"));

    // Nothing was persisted
    let page = h.store.find("campaigns", &Query::new()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn save_reports_genuine_failure_after_hash() {
    let h = harness(ChainScript::FailAfterHash);
    let draft = Campaign::draft("Clean water", addr(1), addr(2));
    let expected_link = format!("https://etherscan.io/tx/{}", h.chain.tx_hash);

    let outcome = h.gateway.save(&draft, addr(1)).await.unwrap();
    let mut events = match outcome {
        SaveOutcome::Deploying(events) => events,
        SaveOutcome::Updated => panic!("expected a deployment"),
    };

    assert!(matches!(
        events.next().await.unwrap(),
        TxEvent::Submitted { .. }
    ));
    assert!(events.next().await.is_none());

    let fatals = h.reporter.fatals.lock().unwrap();
    assert_eq!(fatals.len(), 1);
    assert!(fatals[0].1.contains(&expected_link));
    assert!(fatals[0].1.contains("reverted"));
}

#[tokio::test]
async fn save_reports_network_resolution_failure() {
    let h = harness_with_network(ChainScript::MineAfterHash, Arc::new(FailingNetwork));
    let draft = Campaign::draft("Clean water", addr(1), addr(2));

    let err = h.gateway.save(&draft, addr(1)).await.unwrap_err();
    assert!(matches!(err, GatewayError::Chain(_)));
    assert_eq!(h.reporter.fatals.lock().unwrap().len(), 1);
    assert_eq!(h.chain.create_calls.load(Ordering::SeqCst), 0);
}

// ---- cancel ----------------------------------------------------------------

#[tokio::test]
async fn cancel_patches_record_before_submitted_event() {
    let h = harness(ChainScript::MineAfterHash);
    h.store
        .create("campaigns", campaign_record("c1", 5, "Active", "2024-01-01T00:00:00Z"))
        .await
        .unwrap();

    let mut campaign = h.gateway.get(&RecordId::from("c1")).await.unwrap();
    campaign.address = Some(addr(0xCC));
    let expected_link = format!("https://etherscan.io/tx/{}", h.chain.tx_hash);

    let mut events = h.gateway.cancel(&campaign, addr(1)).await.unwrap();

    match events.next().await.unwrap() {
        TxEvent::Submitted {
            explorer_link,
            record_id,
        } => {
            assert_eq!(explorer_link, expected_link);
            assert!(record_id.is_none());
        }
        other => panic!("expected Submitted, got {other:?}"),
    }

    // The bookkeeping patch landed before the event was emitted
    let patched = h.gateway.get(&RecordId::from("c1")).await.unwrap();
    assert_eq!(patched.status, CampaignStatus::Canceled);
    assert!(!patched.mined);

    assert!(matches!(
        events.next().await.unwrap(),
        TxEvent::Mined { .. }
    ));

    let canceled = h.chain.canceled.lock().unwrap();
    assert_eq!(canceled.as_slice(), &[(addr(0xCC), addr(1))]);
}

#[tokio::test]
async fn cancel_requires_deployed_address() {
    let h = harness(ChainScript::MineAfterHash);
    let mut campaign = Campaign::draft("Clean water", addr(1), addr(2));
    campaign.id = Some(RecordId::from("c1"));

    let err = h.gateway.cancel(&campaign, addr(1)).await.unwrap_err();
    assert!(matches!(err, GatewayError::MissingAddress));
}

#[tokio::test]
async fn cancel_requires_store_record() {
    let h = harness(ChainScript::MineAfterHash);
    let mut campaign = Campaign::draft("Clean water", addr(1), addr(2));
    campaign.address = Some(addr(0xCC));

    let err = h.gateway.cancel(&campaign, addr(1)).await.unwrap_err();
    assert!(matches!(err, GatewayError::MissingRecordId));
}

#[tokio::test]
async fn cancel_warns_and_continues_when_bookkeeping_patch_fails() {
    let h = harness(ChainScript::MineAfterHash);
    // Record never persisted, so the bookkeeping patch cannot land
    let mut campaign = Campaign::draft("Clean water", addr(1), addr(2));
    campaign.id = Some(RecordId::from("ghost"));
    campaign.address = Some(addr(0xCC));

    let mut events = h.gateway.cancel(&campaign, addr(1)).await.unwrap();

    // No Submitted without the patch; confirmation still arrives
    assert!(matches!(
        events.next().await.unwrap(),
        TxEvent::Mined { .. }
    ));
    assert!(events.next().await.is_none());

    let warnings = h.reporter.warnings.lock().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].0,
        "Something went wrong updating the campaign record."
    );
    assert!(h.reporter.fatals.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancel_suppresses_unknown_transaction_after_hash() {
    let h = harness(ChainScript::UnknownTxAfterHash);
    h.store
        .create("campaigns", campaign_record("c1", 5, "Active", "2024-01-01T00:00:00Z"))
        .await
        .unwrap();

    let mut campaign = h.gateway.get(&RecordId::from("c1")).await.unwrap();
    campaign.address = Some(addr(0xCC));

    let mut events = h.gateway.cancel(&campaign, addr(1)).await.unwrap();
    assert!(matches!(
        events.next().await.unwrap(),
        TxEvent::Submitted { .. }
    ));
    assert!(events.next().await.is_none());
    assert!(h.reporter.fatals.lock().unwrap().is_empty());
}
