//! Error types for the sequencer and its batch receivers.

use super::sequencer::SequencerStatus;
use thiserror::Error;

/// Errors returned by [`Sequencer::publish_batch`].
///
/// Whenever one of these is returned the pending buffer is exactly as it was
/// before the call.
///
/// [`Sequencer::publish_batch`]: crate::rollup::Sequencer::publish_batch
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SequencerError {
    /// Publication was requested while the sequencer is not live.
    #[error("sequencer must be live to publish a batch (status: {status})")]
    NotLive {
        /// The lifecycle status at the time of the call.
        status: SequencerStatus,
    },

    /// The batch receiver did not acknowledge the batch.
    #[error("batch {batch_id} was not accepted downstream")]
    Downstream {
        /// Id the batch would have carried.
        batch_id: u64,
        /// The failure reported by the receiver.
        #[source]
        source: ReceiverError,
    },
}

impl SequencerError {
    /// Whether the error was caused by the lifecycle gate.
    #[must_use]
    #[inline]
    pub fn is_not_live(&self) -> bool {
        matches!(self, SequencerError::NotLive { .. })
    }
}

/// Failures a [`BatchReceiver`](crate::rollup::BatchReceiver) can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ReceiverError {
    /// The settlement endpoint could not be reached.
    #[error("batch receiver unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// The endpoint was reached but refused the batch.
    #[error("batch {batch_id} rejected: {reason}")]
    Rejected {
        /// Id of the refused batch.
        batch_id: u64,
        /// Reason given by the endpoint.
        reason: String,
    },
}

/// Errors raised while encoding or decoding batches.
#[derive(Debug, Error)]
#[error("batch serialization error: {message}")]
pub struct SerializationError {
    /// Human-readable description of the failure.
    pub message: String,
}
