/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! The layer-2 transaction sequencer.
//!
//! The [`Sequencer`] buffers transfer intents in intake order and commits the
//! whole buffer to its [`BatchReceiver`] on [`publish_batch`]. Publication is
//! gated on a two-state lifecycle:
//!
//! ```text
//!            shut_down()
//!   [LIVE] ─────────────→ [HALTED]
//!     ↑                       │
//!     └───────── start() ─────┘
//! ```
//!
//! Intake is accepted in both states; only publication is refused while
//! halted. Halting therefore pauses settlement without dropping user-facing
//! availability, and everything collected while halted is carried into the
//! first publish after [`start`](Sequencer::start).
//!
//! # Concurrency
//!
//! All state lives behind one [`Mutex`]. The lock is held across the call to
//! the receiver, so "batch forwarded" and "buffer cleared" are a single step
//! for every other caller: nobody can observe a batch that was delivered
//! while its transactions are still pending, or a cleared buffer whose batch
//! was not delivered.
//!
//! [`publish_batch`]: Sequencer::publish_batch

use super::batch::{Batch, BatchReceipt};
use super::config::{EmptyBatchPolicy, SequencerConfig};
use super::error::SequencerError;
use super::receiver::BatchReceiver;
use super::transaction::{AccountId, TransactionRecord};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, trace, warn};

/// Lifecycle state of a [`Sequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerStatus {
    /// Intake and publication are both allowed.
    Live,
    /// Intake is allowed, publication is refused.
    Halted,
}

impl fmt::Display for SequencerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerStatus::Live => write!(f, "live"),
            SequencerStatus::Halted => write!(f, "halted"),
        }
    }
}

/// Point-in-time counters of a [`Sequencer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerStats {
    /// Current lifecycle state.
    pub status: SequencerStatus,
    /// Transactions waiting for the next publish.
    pub pending: usize,
    /// Transactions accepted since construction.
    pub transactions_accepted: u64,
    /// Batches accepted by the receiver.
    pub batches_published: u64,
    /// Transactions carried by those batches.
    pub transactions_published: u64,
    /// Publish calls refused because the sequencer was halted.
    pub rejected_while_halted: u64,
    /// Publish calls that failed in the receiver.
    pub downstream_failures: u64,
    /// Time of the last successful publish, in milliseconds since the epoch.
    pub last_publish_ms: Option<u64>,
    /// Id the next published batch will carry.
    pub next_batch_id: u64,
}

struct SequencerState {
    pending: Vec<TransactionRecord>,
    status: SequencerStatus,
    next_sequence: u64,
    next_batch_id: u64,
    batches_published: u64,
    transactions_published: u64,
    rejected_while_halted: u64,
    downstream_failures: u64,
    last_publish_ms: Option<u64>,
}

/// Buffers transactions and publishes them in batches to one receiver.
///
/// The receiver is bound at construction and never replaced. The sequencer is
/// `Send + Sync`; share it between producers and the publish trigger with an
/// [`Arc`].
///
/// # Examples
///
/// ```
/// use rollup_sequencer::{Sequencer, SettlementBridge};
/// use std::sync::Arc;
///
/// let bridge = Arc::new(SettlementBridge::new());
/// let sequencer = Sequencer::new(bridge.clone());
///
/// for amount in 1..=5 {
///     sequencer.add_transaction("0xalice", "0xbob", amount);
/// }
/// assert_eq!(sequencer.transactions().len(), 5);
///
/// sequencer.publish_batch().expect("sequencer is live");
/// assert_eq!(bridge.batches_received(), 1);
/// assert!(sequencer.transactions().is_empty());
/// ```
pub struct Sequencer {
    state: Mutex<SequencerState>,
    receiver: Arc<dyn BatchReceiver>,
    config: SequencerConfig,
}

impl Sequencer {
    /// Create a live sequencer bound to `receiver` with default settings.
    pub fn new(receiver: Arc<dyn BatchReceiver>) -> Self {
        Self::with_config(receiver, SequencerConfig::default())
    }

    /// Create a sequencer bound to `receiver` with explicit settings.
    pub fn with_config(receiver: Arc<dyn BatchReceiver>, config: SequencerConfig) -> Self {
        let status = if config.start_halted {
            SequencerStatus::Halted
        } else {
            SequencerStatus::Live
        };
        Self {
            state: Mutex::new(SequencerState {
                pending: Vec::new(),
                status,
                next_sequence: 0,
                next_batch_id: 0,
                batches_published: 0,
                transactions_published: 0,
                rejected_while_halted: 0,
                downstream_failures: 0,
                last_publish_ms: None,
            }),
            receiver,
            config,
        }
    }

    /// The settings this sequencer was built with.
    #[must_use]
    #[inline]
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    // A panic inside a receiver poisons the lock. The buffer is only cleared
    // after the receiver returns, so the guarded state is still consistent.
    fn lock(&self) -> MutexGuard<'_, SequencerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("sequencer state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Append a transfer intent to the pending buffer.
    ///
    /// Accepted in every lifecycle state. No balance, amount or identity
    /// validation is performed. Returns the sequence number assigned to the
    /// new record.
    pub fn add_transaction(
        &self,
        sender: impl Into<AccountId>,
        recipient: impl Into<AccountId>,
        amount: u64,
    ) -> u64 {
        let sender = sender.into();
        let recipient = recipient.into();
        let mut state = self.lock();
        let sequence_num = state.next_sequence;
        state.next_sequence += 1;
        trace!(
            sequence_num,
            sender = %sender,
            recipient = %recipient,
            amount,
            status = %state.status,
            "transaction accepted"
        );
        state.pending.push(TransactionRecord::new(
            sequence_num,
            sender,
            recipient,
            amount,
            current_time_millis(),
        ));

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("sequencer_transactions_accepted_total").increment(1);
            metrics::gauge!("sequencer_pending_transactions").set(state.pending.len() as f64);
        }

        sequence_num
    }

    /// Snapshot of the pending buffer in intake order.
    #[must_use]
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.lock().pending.clone()
    }

    /// Number of pending transactions.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Halt publication. Returns `false` if the sequencer was already halted.
    ///
    /// The pending buffer is not touched.
    pub fn shut_down(&self) -> bool {
        self.transition(SequencerStatus::Halted)
    }

    /// Resume publication. Returns `false` if the sequencer was already live.
    ///
    /// The pending buffer is not touched; transactions collected while
    /// halted go out with the next publish.
    pub fn start(&self) -> bool {
        self.transition(SequencerStatus::Live)
    }

    fn transition(&self, to: SequencerStatus) -> bool {
        let mut state = self.lock();
        if state.status == to {
            debug!(status = %to, "sequencer already in requested state");
            return false;
        }
        let from = state.status;
        state.status = to;
        info!(
            from = %from,
            to = %to,
            pending = state.pending.len(),
            "sequencer state changed"
        );

        #[cfg(feature = "metrics")]
        metrics::gauge!("sequencer_live").set(if to == SequencerStatus::Live { 1.0 } else { 0.0 });

        true
    }

    /// Whether the sequencer currently accepts publish requests.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.status() == SequencerStatus::Live
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SequencerStatus {
        self.lock().status
    }

    /// Commit the whole pending buffer to the receiver as one batch.
    ///
    /// On success the buffer is empty and the receipt of the delivered batch
    /// is returned. With [`EmptyBatchPolicy::Skip`] an empty buffer yields
    /// `Ok(None)` and the receiver is not called.
    ///
    /// # Errors
    ///
    /// - [`SequencerError::NotLive`] if the sequencer is halted.
    /// - [`SequencerError::Downstream`] if the receiver fails.
    ///
    /// In both cases the buffer and the batch id counter are unchanged. No
    /// retry is attempted.
    pub fn publish_batch(&self) -> Result<Option<BatchReceipt>, SequencerError> {
        let mut state = self.lock();

        if state.status != SequencerStatus::Live {
            state.rejected_while_halted += 1;
            debug!(
                pending = state.pending.len(),
                "publish refused, sequencer halted"
            );
            return Err(SequencerError::NotLive {
                status: state.status,
            });
        }

        if state.pending.is_empty() && self.config.empty_batch_policy == EmptyBatchPolicy::Skip {
            trace!("publish skipped, no pending transactions");
            return Ok(None);
        }

        let batch_id = state.next_batch_id;
        let batch = Batch::new(batch_id, current_time_millis(), state.pending.clone());

        if let Err(source) = self.receiver.receive_batch(&batch) {
            state.downstream_failures += 1;
            warn!(
                batch_id,
                transactions = batch.len(),
                error = %source,
                "batch not accepted downstream, buffer kept"
            );

            #[cfg(feature = "metrics")]
            metrics::counter!("sequencer_downstream_failures_total").increment(1);

            return Err(SequencerError::Downstream { batch_id, source });
        }

        state.pending.clear();
        state.next_batch_id += 1;
        state.batches_published += 1;
        state.transactions_published += batch.len() as u64;
        state.last_publish_ms = Some(batch.created_at_ms);

        let receipt = batch.receipt();
        info!(
            batch_id,
            transactions = receipt.transaction_count,
            total_amount = receipt.total_amount,
            commitment = %receipt.commitment,
            "batch published"
        );

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("sequencer_batches_published_total").increment(1);
            metrics::counter!("sequencer_transactions_published_total")
                .increment(receipt.transaction_count as u64);
            metrics::gauge!("sequencer_pending_transactions").set(0.0);
        }

        Ok(Some(receipt))
    }

    /// Point-in-time counters.
    #[must_use]
    pub fn stats(&self) -> SequencerStats {
        let state = self.lock();
        SequencerStats {
            status: state.status,
            pending: state.pending.len(),
            transactions_accepted: state.next_sequence,
            batches_published: state.batches_published,
            transactions_published: state.transactions_published,
            rejected_while_halted: state.rejected_while_halted,
            downstream_failures: state.downstream_failures,
            last_publish_ms: state.last_publish_ms,
            next_batch_id: state.next_batch_id,
        }
    }
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Sequencer")
            .field("status", &state.status)
            .field("pending", &state.pending.len())
            .field("next_sequence", &state.next_sequence)
            .field("next_batch_id", &state.next_batch_id)
            .field("config", &self.config)
            .finish()
    }
}
