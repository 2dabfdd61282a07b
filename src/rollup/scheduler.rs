/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Timer- and threshold-driven publish trigger.
//!
//! The sequencer never publishes on its own. [`PublishScheduler`] is the
//! caller-side trigger: a Tokio task that periodically asks the sequencer to
//! publish. Refusals while halted and downstream failures are logged and
//! counted; the next trigger simply tries again, there is no other retry.
//!
//! Every call into the sequencer, including the pending-count check behind
//! the batch threshold, runs on the blocking pool: the sequencer's lock is
//! held for the full duration of a receiver call.

use super::config::SchedulerConfig;
use super::sequencer::Sequencer;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome counters of a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerReport {
    /// Publish calls issued.
    pub attempts: u64,
    /// Batches accepted downstream.
    pub batches_published: u64,
    /// Transactions carried by those batches.
    pub transactions_published: u64,
    /// Empty publishes skipped by the sequencer's policy.
    pub empty_skips: u64,
    /// Publish calls refused because the sequencer was halted.
    pub halted_skips: u64,
    /// Publish calls that failed downstream (or panicked).
    pub failures: u64,
}

/// Periodically publishes a shared [`Sequencer`].
///
/// # Example
///
/// ```rust,no_run
/// use rollup_sequencer::{PublishScheduler, SchedulerConfig, Sequencer, SettlementBridge};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let bridge = Arc::new(SettlementBridge::new());
/// let sequencer = Arc::new(Sequencer::new(bridge));
/// let config = SchedulerConfig::default().with_batch_threshold(20);
///
/// let handle = PublishScheduler::new(Arc::clone(&sequencer), config)
///     .spawn(&tokio::runtime::Handle::current());
/// // ... producers call sequencer.add_transaction(...)
/// let report = handle.stop().await;
/// println!("published {} batches", report.batches_published);
/// # }
/// ```
#[derive(Debug)]
pub struct PublishScheduler {
    sequencer: Arc<Sequencer>,
    config: SchedulerConfig,
}

impl PublishScheduler {
    /// Create a scheduler for `sequencer`.
    pub fn new(sequencer: Arc<Sequencer>, config: SchedulerConfig) -> Self {
        Self { sequencer, config }
    }

    /// Start the trigger loop on `runtime`.
    pub fn spawn(self, runtime: &Handle) -> SchedulerHandle {
        let stop = Arc::new(Notify::new());
        let task = runtime.spawn(self.run(Arc::clone(&stop)));
        SchedulerHandle { stop, task }
    }

    async fn run(self, stop: Arc<Notify>) -> SchedulerReport {
        let poll = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let interval = Duration::from_millis(self.config.publish_interval_ms);
        let threshold = self.config.batch_threshold;
        let mut report = SchedulerReport::default();
        let mut last_attempt = Instant::now();
        info!(config = ?self.config, "publish scheduler started");

        loop {
            if tokio::time::timeout(poll, stop.notified()).await.is_ok() {
                break;
            }
            let interval_hit = last_attempt.elapsed() >= interval;
            if !interval_hit && threshold.is_none() {
                continue;
            }

            // The sequencer lock is held for a whole receiver call, so even
            // the threshold check runs off the async workers.
            let sequencer = Arc::clone(&self.sequencer);
            let outcome = tokio::task::spawn_blocking(move || {
                let due = interval_hit
                    || threshold.is_some_and(|threshold| sequencer.pending_count() >= threshold);
                due.then(|| sequencer.publish_batch())
            })
            .await;

            match outcome {
                Ok(None) => continue,
                Ok(Some(result)) => {
                    last_attempt = Instant::now();
                    report.attempts += 1;
                    match result {
                        Ok(Some(receipt)) => {
                            report.batches_published += 1;
                            report.transactions_published += receipt.transaction_count as u64;
                        }
                        Ok(None) => report.empty_skips += 1,
                        Err(e) if e.is_not_live() => {
                            report.halted_skips += 1;
                            debug!("scheduled publish skipped, sequencer halted");
                        }
                        Err(e) => {
                            report.failures += 1;
                            warn!(error = %e, "scheduled publish failed, retrying on next trigger");
                        }
                    }
                }
                Err(e) => {
                    last_attempt = Instant::now();
                    report.attempts += 1;
                    report.failures += 1;
                    error!(error = %e, "scheduled publish panicked");
                }
            }
        }

        info!(?report, "publish scheduler stopped");
        report
    }
}

/// Handle to a running [`PublishScheduler`].
#[derive(Debug)]
pub struct SchedulerHandle {
    stop: Arc<Notify>,
    task: JoinHandle<SchedulerReport>,
}

impl SchedulerHandle {
    /// Stop the trigger loop and wait for it to finish.
    ///
    /// A publish already in flight runs to completion first. Returns a
    /// default report if the task was aborted.
    pub async fn stop(self) -> SchedulerReport {
        self.stop.notify_one();
        match self.task.await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "publish scheduler task ended abnormally");
                SchedulerReport::default()
            }
        }
    }

    /// Whether the trigger loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
