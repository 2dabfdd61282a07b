//! Configuration for the sequencer and its publish scheduler.

use super::error::SerializationError;
use serde::{Deserialize, Serialize};

/// Default poll period of the publish scheduler, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default maximum time between publish attempts, in milliseconds.
pub const DEFAULT_PUBLISH_INTERVAL_MS: u64 = 1_000;

/// What [`Sequencer::publish_batch`] does when the buffer is empty.
///
/// [`Sequencer::publish_batch`]: crate::rollup::Sequencer::publish_batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBatchPolicy {
    /// Forward an empty batch to the receiver like any other.
    #[default]
    Forward,
    /// Succeed without calling the receiver and without consuming a batch id.
    Skip,
}

/// Sequencer settings.
///
/// # Examples
///
/// ```
/// use rollup_sequencer::{EmptyBatchPolicy, SequencerConfig};
///
/// let config = SequencerConfig::default().with_empty_batch_policy(EmptyBatchPolicy::Skip);
/// assert_eq!(config.empty_batch_policy, EmptyBatchPolicy::Skip);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Behaviour of a publish on an empty buffer.
    pub empty_batch_policy: EmptyBatchPolicy,

    /// Whether the sequencer starts halted instead of live.
    pub start_halted: bool,
}

impl SequencerConfig {
    /// Set the empty-buffer publish behaviour.
    #[must_use = "builders do nothing unless consumed"]
    #[inline]
    pub fn with_empty_batch_policy(mut self, policy: EmptyBatchPolicy) -> Self {
        self.empty_batch_policy = policy;
        self
    }

    /// Construct the sequencer in the halted state.
    #[must_use = "builders do nothing unless consumed"]
    #[inline]
    pub fn with_start_halted(mut self, start_halted: bool) -> Self {
        self.start_halted = start_halted;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the input is not valid JSON for
    /// this type.
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        serde_json::from_str(json).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }
}

/// Settings for the [`PublishScheduler`](crate::rollup::PublishScheduler).
///
/// The scheduler wakes every `poll_interval_ms` and publishes when the
/// buffer holds at least `batch_threshold` transactions, or when
/// `publish_interval_ms` has passed since its last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Wake-up period in milliseconds. Values of zero are treated as one.
    pub poll_interval_ms: u64,

    /// Maximum time between publish attempts in milliseconds.
    pub publish_interval_ms: u64,

    /// Publish as soon as this many transactions are pending. `None`
    /// disables the size trigger.
    pub batch_threshold: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            publish_interval_ms: DEFAULT_PUBLISH_INTERVAL_MS,
            batch_threshold: None,
        }
    }
}

impl SchedulerConfig {
    /// Set the wake-up period.
    #[must_use = "builders do nothing unless consumed"]
    #[inline]
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the maximum time between publish attempts.
    #[must_use = "builders do nothing unless consumed"]
    #[inline]
    pub fn with_publish_interval_ms(mut self, publish_interval_ms: u64) -> Self {
        self.publish_interval_ms = publish_interval_ms;
        self
    }

    /// Enable the size trigger.
    #[must_use = "builders do nothing unless consumed"]
    #[inline]
    pub fn with_batch_threshold(mut self, batch_threshold: usize) -> Self {
        self.batch_threshold = Some(batch_threshold);
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the input is not valid JSON for
    /// this type.
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        serde_json::from_str(json).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }
}
