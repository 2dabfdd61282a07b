/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use rollup_sequencer::prelude::*;
//! ```

// Core sequencer types
pub use crate::rollup::{Sequencer, SequencerError, SequencerStats, SequencerStatus};

// Transactions and batches
pub use crate::rollup::{AccountId, Batch, BatchReceipt, TransactionRecord};

// Receivers and their events
pub use crate::rollup::{
    BatchReceiver, ChannelBatchReceiver, EncodedBatch, ReceiverError, ReceiverEvent,
    ReceiverListener, SettlementBridge,
};

// Configuration and scheduling
pub use crate::rollup::{
    EmptyBatchPolicy, PublishScheduler, SchedulerConfig, SchedulerHandle, SchedulerReport,
    SequencerConfig,
};

// Serialization
pub use crate::rollup::{BatchSerializer, JsonBatchSerializer, SerializationError};

// Utility functions
pub use crate::utils::current_time_millis;
