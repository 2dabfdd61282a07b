//! # Layer-2 Transaction Sequencer
//!
//! An in-memory transaction sequencer for a two-layer ledger. Clients submit
//! value-transfer intents to the layer-2 [`Sequencer`], which buffers them in
//! intake order and, when asked, commits the whole buffer as one [`Batch`] to
//! a layer-1 [`BatchReceiver`].
//!
//! ## Key Features
//!
//! - **Unconditional Intake**: `add_transaction` is accepted whether the
//!   sequencer is live or halted. Halting pauses settlement, never collection.
//!
//! - **Lifecycle Gate**: `publish_batch` only succeeds while live. A refused
//!   publish leaves the buffer exactly as it was.
//!
//! - **Atomic Commit**: forwarding a batch and clearing the buffer happen
//!   under one lock. Every buffered transaction lands in exactly one
//!   delivered batch.
//!
//! - **Failure Isolation**: if the receiver fails, the buffer is kept and the
//!   error surfaces to the caller. There is no hidden retry.
//!
//! - **Observable Settlement**: receivers raise `BatchReceived` and
//!   `TransactionReceived` events to registered listeners, which is how
//!   monitoring and throughput measurements see publication happen.
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`Sequencer`] | Buffer, Live/Halted state, batch assembly and publish |
//! | [`TransactionRecord`] | Immutable transfer intent (sender, recipient, amount) |
//! | [`BatchReceiver`] | Downstream contract: accept a batch or fail |
//! | [`SettlementBridge`] | In-memory receiver with event log and listeners |
//! | [`ChannelBatchReceiver`] | Encodes batches onto a Tokio channel for a relay |
//! | [`PublishScheduler`] | Timer/threshold publish trigger running on Tokio |
//!
//! ## Lifecycle
//!
//! ```text
//!   add_transaction ──→ [pending buffer] ──publish_batch──→ BatchReceiver
//!                              │                 │
//!                    accepted in any state   LIVE only
//!
//!            shut_down()
//!   [LIVE] ─────────────→ [HALTED]
//!     ↑                       │
//!     └───────── start() ─────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rollup_sequencer::prelude::*;
//! use std::sync::Arc;
//!
//! let bridge = Arc::new(SettlementBridge::new());
//! let sequencer = Sequencer::new(bridge.clone());
//!
//! for amount in 1..=5 {
//!     sequencer.add_transaction("0xalice", "0xbob", amount);
//! }
//! sequencer.publish_batch().expect("sequencer is live");
//! assert_eq!(bridge.batches_received(), 1);
//!
//! sequencer.shut_down();
//! sequencer.add_transaction("0xalice", "0xbob", 6);
//! assert!(sequencer.publish_batch().is_err());
//! assert_eq!(sequencer.pending_count(), 1);
//!
//! sequencer.start();
//! sequencer.publish_batch().expect("sequencer is live again");
//! assert_eq!(bridge.transactions_received(), 6);
//! ```
//!
//! ## Feature Flags
//!
//! - `bincode`: enables `BincodeBatchSerializer` for compact batch payloads.
//! - `metrics`: emits counters and gauges through the `metrics` facade on
//!   intake, lifecycle changes and publication.
//!
//! ## Out of Scope
//!
//! Signature verification, fee computation, balance checks, consensus among
//! sequencers, fraud proofs and persistence are not part of this crate.

pub mod rollup;

pub mod prelude;
mod utils;

#[cfg(feature = "bincode")]
pub use rollup::BincodeBatchSerializer;
pub use rollup::{
    AccountId, Batch, BatchReceipt, BatchReceiver, BatchSerializer, ChannelBatchReceiver,
    EmptyBatchPolicy, EncodedBatch, JsonBatchSerializer, PublishScheduler, ReceiverError,
    ReceiverEvent, ReceiverListener, SchedulerConfig, SchedulerHandle, SchedulerReport, Sequencer,
    SequencerConfig, SequencerError, SequencerStats, SequencerStatus, SerializationError,
    SettlementBridge, TransactionRecord,
};
pub use utils::current_time_millis;
