//! Channel transport from the sequencer to an asynchronous relay.
//!
//! [`ChannelBatchReceiver`] encodes each batch with a [`BatchSerializer`] and
//! hands the payload to a Tokio unbounded channel. The consuming side is
//! typically a relay task that submits [`EncodedBatch`]es to the settlement
//! layer. Sending never blocks, so the sequencer's lock is only held for the
//! encoding step.

use super::batch::Batch;
use super::error::ReceiverError;
use super::receiver::{BatchReceiver, ReceiverEvent, ReceiverListener, notify_listeners};
use super::serialization::BatchSerializer;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{error, trace};

/// A batch payload ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    /// Id of the encoded batch.
    pub batch_id: u64,
    /// Number of transactions in the batch.
    pub transaction_count: usize,
    /// Hex-encoded commitment of the batch.
    pub commitment: String,
    /// Content type reported by the serializer.
    pub content_type: &'static str,
    /// Encoded batch bytes.
    pub payload: Vec<u8>,
}

/// [`BatchReceiver`] that forwards encoded batches over a Tokio channel.
///
/// A batch counts as received once it is queued on the channel. If the
/// consuming side has been dropped the call fails with
/// [`ReceiverError::Unavailable`]; if encoding fails it fails with
/// [`ReceiverError::Rejected`].
pub struct ChannelBatchReceiver {
    sender: UnboundedSender<EncodedBatch>,
    serializer: Arc<dyn BatchSerializer>,
    listener: Option<ReceiverListener>,
    batches_sent: AtomicU64,
    transactions_sent: AtomicU64,
}

impl ChannelBatchReceiver {
    /// Create a receiver and the channel end its batches arrive on.
    pub fn new(serializer: Arc<dyn BatchSerializer>) -> (Self, UnboundedReceiver<EncodedBatch>) {
        let (sender, receiver) = unbounded_channel();
        (
            Self {
                sender,
                serializer,
                listener: None,
                batches_sent: AtomicU64::new(0),
                transactions_sent: AtomicU64::new(0),
            },
            receiver,
        )
    }

    /// Attach a listener notified for every accepted batch and transaction.
    #[must_use = "builders do nothing unless consumed"]
    pub fn with_listener(mut self, listener: ReceiverListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Number of batches queued on the channel.
    #[must_use]
    #[inline]
    pub fn batches_sent(&self) -> u64 {
        self.batches_sent.load(Ordering::Relaxed)
    }

    /// Number of transactions carried by the queued batches.
    #[must_use]
    #[inline]
    pub fn transactions_sent(&self) -> u64 {
        self.transactions_sent.load(Ordering::Relaxed)
    }

    fn notify(&self, batch: &Batch, commitment: &str) {
        let Some(listener) = &self.listener else {
            return;
        };
        let listeners = std::slice::from_ref(listener);
        notify_listeners(
            listeners,
            &ReceiverEvent::BatchReceived {
                batch_id: batch.batch_id,
                transaction_count: batch.len(),
                commitment: commitment.to_string(),
            },
        );
        for transaction in &batch.transactions {
            notify_listeners(
                listeners,
                &ReceiverEvent::TransactionReceived {
                    batch_id: batch.batch_id,
                    transaction: transaction.clone(),
                },
            );
        }
    }
}

impl BatchReceiver for ChannelBatchReceiver {
    fn receive_batch(&self, batch: &Batch) -> Result<(), ReceiverError> {
        let payload = self.serializer.serialize_batch(batch).map_err(|e| {
            error!(batch_id = batch.batch_id, error = %e, "failed to encode batch");
            ReceiverError::Rejected {
                batch_id: batch.batch_id,
                reason: e.to_string(),
            }
        })?;

        let commitment = batch.commitment();
        let encoded = EncodedBatch {
            batch_id: batch.batch_id,
            transaction_count: batch.len(),
            commitment: commitment.clone(),
            content_type: self.serializer.content_type(),
            payload,
        };

        self.sender.send(encoded).map_err(|_| {
            error!(batch_id = batch.batch_id, "batch relay channel closed");
            ReceiverError::Unavailable {
                message: "batch relay channel closed".to_string(),
            }
        })?;

        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.transactions_sent
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
        trace!(
            batch_id = batch.batch_id,
            transactions = batch.len(),
            "batch queued for relay"
        );
        self.notify(batch, &commitment);
        Ok(())
    }
}

impl std::fmt::Debug for ChannelBatchReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBatchReceiver")
            .field("serializer", &self.serializer)
            .field("has_listener", &self.listener.is_some())
            .field("batches_sent", &self.batches_sent())
            .field("transactions_sent", &self.transactions_sent())
            .finish()
    }
}
