//! In-memory settlement endpoint.
//!
//! [`SettlementBridge`] plays the layer-1 side of the sequencer: it accepts
//! batches, keeps an append-only log of the events it raised, and fans each
//! event out to registered [`ReceiverListener`]s. It can be taken offline to
//! exercise the sequencer's downstream failure path.

use super::batch::Batch;
use super::error::ReceiverError;
use super::receiver::{BatchReceiver, ReceiverEvent, ReceiverListener, notify_listeners};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error};

/// Reference [`BatchReceiver`] that records everything it accepts.
///
/// # Metrics
///
/// - **batches_received**: number of `BatchReceived` events raised
/// - **transactions_received**: number of `TransactionReceived` events
///   raised, cumulative across all batches
///
/// # Example
///
/// ```rust
/// use rollup_sequencer::{ReceiverEvent, Sequencer, SettlementBridge};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
///
/// let bridge = Arc::new(SettlementBridge::new());
/// bridge.subscribe(Arc::new(move |event: &ReceiverEvent| {
///     if event.is_transaction_received() {
///         counter.fetch_add(1, Ordering::Relaxed);
///     }
/// }));
///
/// let sequencer = Sequencer::new(bridge.clone());
/// sequencer.add_transaction("0xalice", "0xbob", 10);
/// sequencer.add_transaction("0xbob", "0xcarol", 4);
/// sequencer.publish_batch().expect("sequencer is live");
///
/// assert_eq!(seen.load(Ordering::Relaxed), 2);
/// assert_eq!(bridge.transactions_received(), 2);
/// ```
pub struct SettlementBridge {
    available: AtomicBool,
    batches_received: AtomicU64,
    transactions_received: AtomicU64,
    events: Mutex<Vec<ReceiverEvent>>,
    batches: Mutex<Vec<Batch>>,
    listeners: RwLock<Vec<ReceiverListener>>,
}

impl SettlementBridge {
    /// Create an online bridge with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            batches_received: AtomicU64::new(0),
            transactions_received: AtomicU64::new(0),
            events: Mutex::new(Vec::new()),
            batches: Mutex::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener for every subsequent event.
    pub fn subscribe(&self, listener: ReceiverListener) {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    /// Take the bridge offline (`false`) or bring it back (`true`).
    ///
    /// While offline every [`receive_batch`](BatchReceiver::receive_batch)
    /// call fails with [`ReceiverError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        debug!(available, "settlement bridge availability changed");
    }

    /// Whether the bridge currently accepts batches.
    #[must_use]
    #[inline]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Number of `BatchReceived` events raised so far.
    #[must_use]
    #[inline]
    pub fn batches_received(&self) -> u64 {
        self.batches_received.load(Ordering::Relaxed)
    }

    /// Number of `TransactionReceived` events raised so far.
    #[must_use]
    #[inline]
    pub fn transactions_received(&self) -> u64 {
        self.transactions_received.load(Ordering::Relaxed)
    }

    /// Every event raised so far, oldest first.
    #[must_use]
    pub fn past_events(&self) -> Vec<ReceiverEvent> {
        Self::guard(&self.events).clone()
    }

    /// Events raised for the batches with id `>= from_batch`.
    #[must_use]
    pub fn events_since(&self, from_batch: u64) -> Vec<ReceiverEvent> {
        Self::guard(&self.events)
            .iter()
            .filter(|event| event.batch_id() >= from_batch)
            .cloned()
            .collect()
    }

    /// Every accepted batch, in acceptance order.
    #[must_use]
    pub fn received_batches(&self) -> Vec<Batch> {
        Self::guard(&self.batches).clone()
    }

    fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn listeners(&self) -> Vec<ReceiverListener> {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for SettlementBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchReceiver for SettlementBridge {
    fn receive_batch(&self, batch: &Batch) -> Result<(), ReceiverError> {
        if !self.is_available() {
            error!(
                batch_id = batch.batch_id,
                "settlement bridge offline, batch refused"
            );
            return Err(ReceiverError::Unavailable {
                message: "settlement bridge is offline".to_string(),
            });
        }

        let mut events = Vec::with_capacity(batch.len() + 1);
        events.push(ReceiverEvent::BatchReceived {
            batch_id: batch.batch_id,
            transaction_count: batch.len(),
            commitment: batch.commitment(),
        });
        events.extend(
            batch
                .transactions
                .iter()
                .map(|transaction| ReceiverEvent::TransactionReceived {
                    batch_id: batch.batch_id,
                    transaction: transaction.clone(),
                }),
        );

        // Commit first; listeners may read the bridge back.
        {
            let mut log = Self::guard(&self.events);
            let mut batches = Self::guard(&self.batches);
            log.extend(events.iter().cloned());
            batches.push(batch.clone());
            self.batches_received.fetch_add(1, Ordering::Relaxed);
            self.transactions_received
                .fetch_add(batch.len() as u64, Ordering::Relaxed);
        }
        debug!(
            batch_id = batch.batch_id,
            transactions = batch.len(),
            "batch received"
        );

        let listeners = self.listeners();
        for event in &events {
            notify_listeners(&listeners, event);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SettlementBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementBridge")
            .field("available", &self.is_available())
            .field("batches_received", &self.batches_received())
            .field("transactions_received", &self.transactions_received())
            .finish()
    }
}
