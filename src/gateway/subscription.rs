//! Cancellable handles for long-lived gateway flows.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::GatewayError;
use crate::models::RecordId;

/// Progress of a chain mutation, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxEvent {
    /// The transaction hash was observed and the store record is in place.
    /// `record_id` is set when the mutation created a new record.
    Submitted {
        explorer_link: String,
        record_id: Option<RecordId>,
    },
    /// The transaction reached confirmation depth.
    Mined { explorer_link: String },
}

/// Receiver for a mutation's progress events.
///
/// Dropping the receiver does NOT abort the mutation; the driving task runs
/// to completion and reports failures through the error sink regardless.
#[derive(Debug)]
pub struct TxEvents {
    rx: mpsc::UnboundedReceiver<TxEvent>,
}

impl TxEvents {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<TxEvent>) -> Self {
        Self { rx }
    }

    /// Next progress event; `None` once the mutation has settled.
    pub async fn next(&mut self) -> Option<TxEvent> {
        self.rx.recv().await
    }
}

/// Outcome of [`CampaignGateway::save`](crate::gateway::CampaignGateway::save).
#[derive(Debug)]
pub enum SaveOutcome {
    /// Existing record patched; no chain interaction.
    Updated,
    /// New campaign submitted on-chain; follow progress on the events.
    Deploying(TxEvents),
}

/// A live push subscription. The caller owns cancellation: call
/// [`Subscription::cancel`] or drop the handle to end it.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<Result<T, GatewayError>>,
    task: JoinHandle<()>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Result<T, GatewayError>>,
        task: JoinHandle<()>,
    ) -> Self {
        Self { rx, task }
    }

    /// Next emission: the full current result set, or a delivery failure.
    pub async fn next(&mut self) -> Option<Result<T, GatewayError>> {
        self.rx.recv().await
    }

    /// End the subscription.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
