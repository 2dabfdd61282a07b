//! Batches assembled from the pending buffer and their publish receipts.

use super::transaction::TransactionRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An ordered group of transactions committed together in one publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Position of this batch in the sequencer's publish history, starting at 0.
    pub batch_id: u64,

    /// Assembly time in milliseconds since the Unix epoch.
    pub created_at_ms: u64,

    /// Transactions in intake order.
    pub transactions: Vec<TransactionRecord>,
}

impl Batch {
    pub(crate) fn new(
        batch_id: u64,
        created_at_ms: u64,
        transactions: Vec<TransactionRecord>,
    ) -> Self {
        Self {
            batch_id,
            created_at_ms,
            transactions,
        }
    }

    /// Number of transactions in the batch.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the batch carries no transactions.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of all transferred amounts, saturating at `u64::MAX`.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.transactions
            .iter()
            .fold(0u64, |acc, tx| acc.saturating_add(tx.amount()))
    }

    /// Hex-encoded SHA-256 commitment over the ordered batch contents.
    ///
    /// The digest covers the batch id and, for every transaction in order,
    /// its id, sequence number, sender, recipient and amount. Two batches
    /// with the same transactions in a different order commit differently.
    #[must_use]
    pub fn commitment(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.batch_id.to_be_bytes());
        for tx in &self.transactions {
            hasher.update(tx.id().as_bytes());
            hasher.update(tx.sequence_num().to_be_bytes());
            hasher.update((tx.sender().as_str().len() as u64).to_be_bytes());
            hasher.update(tx.sender().as_str().as_bytes());
            hasher.update((tx.recipient().as_str().len() as u64).to_be_bytes());
            hasher.update(tx.recipient().as_str().as_bytes());
            hasher.update(tx.amount().to_be_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Build the receipt handed back to the caller of a successful publish.
    #[must_use]
    pub fn receipt(&self) -> BatchReceipt {
        BatchReceipt {
            batch_id: self.batch_id,
            transaction_count: self.len(),
            total_amount: self.total_amount(),
            commitment: self.commitment(),
        }
    }
}

/// Summary of a batch accepted by the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    /// Id of the published batch.
    pub batch_id: u64,
    /// Number of transactions the batch carried.
    pub transaction_count: usize,
    /// Saturating sum of the transferred amounts.
    pub total_amount: u64,
    /// Hex-encoded SHA-256 commitment, see [`Batch::commitment`].
    pub commitment: String,
}
