//! Transfer intents accepted by the sequencer.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a ledger account, e.g. a hex-encoded address.
///
/// The sequencer treats identities as opaque: it never resolves them against
/// the account ledger and performs no format validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identity from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An immutable descriptor of one value transfer.
///
/// Records are created by [`Sequencer::add_transaction`] and never mutated
/// afterwards; the fields are private and only exposed through accessors.
/// The sequencer assigns `sequence_num` from a per-instance counter, so
/// within one sequencer sequence numbers are unique, gap-free and follow
/// intake order.
///
/// [`Sequencer::add_transaction`]: crate::rollup::Sequencer::add_transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: Uuid,
    sequence_num: u64,
    sender: AccountId,
    recipient: AccountId,
    amount: u64,
    timestamp_ms: u64,
}

impl TransactionRecord {
    pub(crate) fn new(
        sequence_num: u64,
        sender: AccountId,
        recipient: AccountId,
        amount: u64,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence_num,
            sender,
            recipient,
            amount,
            timestamp_ms,
        }
    }

    /// Unique identifier of this transfer intent.
    #[must_use]
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Intake position assigned by the sequencer.
    #[must_use]
    #[inline]
    pub fn sequence_num(&self) -> u64 {
        self.sequence_num
    }

    /// Account debited by the transfer.
    #[must_use]
    #[inline]
    pub fn sender(&self) -> &AccountId {
        &self.sender
    }

    /// Account credited by the transfer.
    #[must_use]
    #[inline]
    pub fn recipient(&self) -> &AccountId {
        &self.recipient
    }

    /// Value transferred.
    #[must_use]
    #[inline]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Intake time in milliseconds since the Unix epoch.
    #[must_use]
    #[inline]
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}
