//! Layer-2 sequencing: intake, lifecycle, batch assembly and publication.

/// Batches and publish receipts.
pub mod batch;
/// In-memory settlement endpoint raising receiver events.
pub mod bridge;
/// Tokio channel transport towards an asynchronous relay.
pub mod channel;
pub mod config;
pub mod error;
/// The downstream batch receiver contract.
pub mod receiver;
/// Caller-side publish trigger.
pub mod scheduler;
pub mod sequencer;
/// Pluggable batch encodings.
pub mod serialization;
pub mod transaction;


pub use batch::{Batch, BatchReceipt};
pub use bridge::SettlementBridge;
pub use channel::{ChannelBatchReceiver, EncodedBatch};
pub use config::{EmptyBatchPolicy, SchedulerConfig, SequencerConfig};
pub use error::{ReceiverError, SequencerError, SerializationError};
pub use receiver::{BatchReceiver, ReceiverEvent, ReceiverListener};
pub use scheduler::{PublishScheduler, SchedulerHandle, SchedulerReport};
pub use sequencer::{Sequencer, SequencerStats, SequencerStatus};
#[cfg(feature = "bincode")]
pub use serialization::BincodeBatchSerializer;
pub use serialization::{BatchSerializer, JsonBatchSerializer};
pub use transaction::{AccountId, TransactionRecord};
