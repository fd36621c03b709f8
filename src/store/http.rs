//! HTTP client for the hosted store.
//!
//! # Responsibilities
//! - Render queries onto the store's REST surface
//! - Map transport, status, and decode failures into `StoreError`
//! - Approximate the push interface by polling: re-run the query on an
//!   interval and emit only when the result set actually changed
//!
//! The hosted service's real-time wire protocol is not owned here; polling
//! keeps the watch contract (full current result set per emission) without
//! depending on it.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::config::schema::StoreConfig;
use crate::models::RecordId;
use crate::store::query::Query;
use crate::store::{Page, Store, StoreError, WatchStream};

/// Client for the store's REST surface.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.watch_poll_interval_ms),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: &RecordId) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    async fn run_find(&self, collection: &str, query: &Query) -> Result<Page, StoreError> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(StoreError::Status {
            status: status.as_u16(),
            detail,
        });
    }
    response
        .json()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

fn fingerprint(page: &Page) -> u64 {
    let serialized = serde_json::to_string(page).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    serialized.hash(&mut hasher);
    hasher.finish()
}

#[async_trait]
impl Store for HttpStore {
    async fn find(&self, collection: &str, query: &Query) -> Result<Page, StoreError> {
        self.run_find(collection, query).await
    }

    async fn create(&self, collection: &str, record: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        decode(response).await
    }

    async fn patch(
        &self,
        collection: &str,
        id: &RecordId,
        changes: Value,
    ) -> Result<Value, StoreError> {
        let response = self
            .client
            .patch(self.record_url(collection, id))
            .json(&changes)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        decode(response).await
    }

    fn watch(&self, collection: &str, query: Query) -> WatchStream {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let state = PollState {
            store: self.clone(),
            collection: collection.to_string(),
            query,
            ticker,
            last: None,
        };
        Box::pin(stream::unfold(state, |mut state| async move {
            loop {
                state.ticker.tick().await;
                match state.store.run_find(&state.collection, &state.query).await {
                    Ok(page) => {
                        let current = fingerprint(&page);
                        if state.last != Some(current) {
                            state.last = Some(current);
                            return Some((Ok(page), state));
                        }
                    }
                    // Deliver the failure and keep the subscription alive;
                    // the caller decides when to drop it.
                    Err(e) => return Some((Err(e), state)),
                }
            }
        }))
    }
}

struct PollState {
    store: HttpStore,
    collection: String,
    query: Query,
    ticker: Interval,
    last: Option<u64>,
}
