//! Remote store abstraction.
//!
//! # Data Flow
//! ```text
//! Query (builder)
//!     → Store::find / create / patch (one-shot, request/response)
//!     → Page { data, total }
//!
//! Store::watch(query)
//!     → WatchStream (re-delivers the full current result set on change,
//!       until the caller drops the stream)
//! ```
//!
//! # Design Decisions
//! - The trait works in raw JSON records; domain mapping happens one layer up
//! - Read failures propagate untransformed to the caller
//! - `HttpStore` talks to the hosted service; `MemoryStore` backs local
//!   development and the integration tests

pub mod http;
pub mod memory;
pub mod query;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::RecordId;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use query::Query;

/// Campaign collection name.
pub const CAMPAIGNS: &str = "campaigns";
/// Milestone collection name.
pub const MILESTONES: &str = "milestones";
/// Donation collection name.
pub const DONATIONS: &str = "donations";

/// Errors from store requests.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection, timeout, malformed URL).
    #[error("store request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("store returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response body did not decode into the expected shape.
    #[error("failed to decode store response: {0}")]
    Decode(String),

    /// Patch target does not exist.
    #[error("no record `{id}` in collection `{collection}`")]
    MissingRecord { collection: String, id: String },
}

/// One page of a find result. `total` counts every match, not just this page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T = Value> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    /// Map each record, preserving the total count; the first failure wins.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let data = self.data.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            data,
            total: self.total,
        })
    }
}

/// Push stream of full result sets, one emission per observed change.
pub type WatchStream = BoxStream<'static, Result<Page, StoreError>>;

/// The remote query/mutation service holding campaign, milestone, and
/// donation records. The store is authoritative for all entity state.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch one page of records matching the query.
    async fn find(&self, collection: &str, query: &Query) -> Result<Page, StoreError>;

    /// Persist a new record; the returned record carries its assigned id.
    async fn create(&self, collection: &str, record: Value) -> Result<Value, StoreError>;

    /// Apply a partial update to an existing record.
    async fn patch(
        &self,
        collection: &str,
        id: &RecordId,
        changes: Value,
    ) -> Result<Value, StoreError>;

    /// Open a push subscription that re-delivers the full current result set
    /// whenever matching data changes. The caller owns cancellation: dropping
    /// the stream ends the subscription.
    fn watch(&self, collection: &str, query: Query) -> WatchStream;
}
