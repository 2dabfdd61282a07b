//! The downstream contract the sequencer publishes to.
//!
//! A [`BatchReceiver`] stands in for the layer-1 settlement point. The
//! sequencer only relies on [`receive_batch`](BatchReceiver::receive_batch)
//! succeeding or failing; the [`ReceiverEvent`] notifications are the
//! receiver's own observable output, used by monitoring and throughput
//! measurements.

use super::batch::Batch;
use super::error::ReceiverError;
use super::transaction::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::error;

/// Accepts published batches on behalf of the settlement layer.
///
/// # Contract
///
/// - A call that returns `Ok(())` has accepted the whole batch. It raises
///   exactly one [`ReceiverEvent::BatchReceived`] and one
///   [`ReceiverEvent::TransactionReceived`] per transaction in the batch.
/// - A call that returns an error has accepted nothing and raises no events.
/// - Once a batch is committed the call must return `Ok(())`. Listener
///   callbacks run after the commit and cannot fail it.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the sequencer holds them behind an
/// `Arc` and calls them while holding its own lock, so a call must not
/// re-enter the sequencer that issued it.
pub trait BatchReceiver: Send + Sync {
    /// Accept a batch.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError`] if the batch could not be delivered or was
    /// refused.
    fn receive_batch(&self, batch: &Batch) -> Result<(), ReceiverError>;
}

impl<R: BatchReceiver + ?Sized> BatchReceiver for Arc<R> {
    fn receive_batch(&self, batch: &Batch) -> Result<(), ReceiverError> {
        (**self).receive_batch(batch)
    }
}

/// Notifications raised by a receiver for every accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiverEvent {
    /// A batch was accepted.
    BatchReceived {
        /// Id of the accepted batch.
        batch_id: u64,
        /// Number of transactions it carried.
        transaction_count: usize,
        /// Hex-encoded commitment of the batch.
        commitment: String,
    },

    /// One transaction inside an accepted batch.
    TransactionReceived {
        /// Id of the batch carrying the transaction.
        batch_id: u64,
        /// The transaction itself.
        transaction: TransactionRecord,
    },
}

impl ReceiverEvent {
    /// Id of the batch this event belongs to.
    #[must_use]
    pub fn batch_id(&self) -> u64 {
        match self {
            ReceiverEvent::BatchReceived { batch_id, .. }
            | ReceiverEvent::TransactionReceived { batch_id, .. } => *batch_id,
        }
    }

    /// Whether this is a [`ReceiverEvent::BatchReceived`].
    #[must_use]
    #[inline]
    pub fn is_batch_received(&self) -> bool {
        matches!(self, ReceiverEvent::BatchReceived { .. })
    }

    /// Whether this is a [`ReceiverEvent::TransactionReceived`].
    #[must_use]
    #[inline]
    pub fn is_transaction_received(&self) -> bool {
        matches!(self, ReceiverEvent::TransactionReceived { .. })
    }
}

/// A thread-safe callback invoked for every receiver event.
///
/// Listeners run after the receiver has accepted the batch. A panicking
/// listener is logged and skipped; it never turns an accepted batch into a
/// failed call.
pub type ReceiverListener = Arc<dyn Fn(&ReceiverEvent) + Send + Sync>;

/// Deliver `event` to every listener, isolating panics per call.
pub(crate) fn notify_listeners(listeners: &[ReceiverListener], event: &ReceiverEvent) {
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
            error!(
                batch_id = event.batch_id(),
                "receiver listener panicked, event dropped for this listener"
            );
        }
    }
}
