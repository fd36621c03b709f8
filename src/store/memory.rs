//! In-process store backing local development and the integration tests.
//!
//! Collections live in a shared map; every create/patch broadcasts the
//! collection name so watchers can re-run their query and push the full
//! current result set, mirroring the hosted service's re-list-on-change
//! behavior.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream;
use serde_json::{json, Value};
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::models::RecordId;
use crate::store::query::Query;
use crate::store::{Page, Store, StoreError, WatchStream};

const CHANGE_BUS_CAPACITY: usize = 64;

/// HashMap-backed store with a broadcast change bus.
#[derive(Clone)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    changes: broadcast::Sender<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUS_CAPACITY);
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
            changes,
        }
    }

    async fn run_query(&self, collection: &str, query: &Query) -> Page {
        let collections = self.collections.lock().await;
        let records = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        let (data, total) = query.evaluate(records);
        Page { data, total }
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine; watchers may not exist yet.
        let _ = self.changes.send(collection.to_string());
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find(&self, collection: &str, query: &Query) -> Result<Page, StoreError> {
        Ok(self.run_query(collection, query).await)
    }

    async fn create(&self, collection: &str, record: Value) -> Result<Value, StoreError> {
        let mut record = record;
        if let Some(object) = record.as_object_mut() {
            if !object.contains_key("_id") {
                object.insert("_id".to_string(), json!(Uuid::new_v4().to_string()));
            }
            if !object.contains_key("createdAt") {
                object.insert("createdAt".to_string(), json!(Utc::now().to_rfc3339()));
            }
        }
        {
            let mut collections = self.collections.lock().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .push(record.clone());
        }
        self.notify(collection);
        Ok(record)
    }

    async fn patch(
        &self,
        collection: &str,
        id: &RecordId,
        changes: Value,
    ) -> Result<Value, StoreError> {
        let patched = {
            let mut collections = self.collections.lock().await;
            let records = collections
                .entry(collection.to_string())
                .or_default()
                .iter_mut()
                .find(|record| record.get("_id").and_then(Value::as_str) == Some(id.as_str()));
            let record = records.ok_or_else(|| StoreError::MissingRecord {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
            if let (Some(target), Some(source)) = (record.as_object_mut(), changes.as_object()) {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            record.clone()
        };
        self.notify(collection);
        Ok(patched)
    }

    fn watch(&self, collection: &str, query: Query) -> WatchStream {
        let state = WatchState {
            store: self.clone(),
            collection: collection.to_string(),
            query,
            rx: self.changes.subscribe(),
            primed: false,
        };
        Box::pin(stream::unfold(state, |mut state| async move {
            if state.primed {
                loop {
                    match state.rx.recv().await {
                        Ok(changed) if changed == state.collection => break,
                        Ok(_) => {}
                        // A lagged bus still means something changed; re-list.
                        Err(broadcast::error::RecvError::Lagged(_)) => break,
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
            state.primed = true;
            let page = state.store.run_query(&state.collection, &state.query).await;
            Some((Ok(page), state))
        }))
    }
}

struct WatchState {
    store: MemoryStore,
    collection: String,
    query: Query,
    rx: broadcast::Receiver<String>,
    primed: bool,
}
