// demos/src/bin/scheduled_relay.rs
//
// Drives a sequencer with a PublishScheduler and relays the encoded batches
// through a Tokio channel, as a settlement submitter would.
//
// Configuration is loaded from JSON to show the serde-backed config types.
// Halfway through, the sequencer is halted for a while; the scheduler keeps
// running, counts the refused publishes, and flushes the backlog once the
// sequencer is started again.
//
// Run this demo with:
//   cargo run --bin scheduled_relay
//   (from the demos directory)

use rollup_sequencer::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};

const SEQUENCER_CONFIG: &str = r#"{ "empty_batch_policy": "skip" }"#;
const SCHEDULER_CONFIG: &str =
    r#"{ "poll_interval_ms": 10, "publish_interval_ms": 250, "batch_threshold": 25 }"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    info!("Scheduled relay demo");

    let sequencer_config = match SequencerConfig::from_json(SEQUENCER_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("invalid sequencer config: {}", e);
            return;
        }
    };
    let scheduler_config = match SchedulerConfig::from_json(SCHEDULER_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("invalid scheduler config: {}", e);
            return;
        }
    };
    info!("sequencer config: {:?}", sequencer_config);
    info!("scheduler config: {:?}", scheduler_config);

    let serializer: Arc<dyn BatchSerializer> = Arc::new(JsonBatchSerializer::new());
    let (receiver, mut batches) = ChannelBatchReceiver::new(Arc::clone(&serializer));
    let sequencer = Arc::new(Sequencer::with_config(Arc::new(receiver), sequencer_config));

    let relay = tokio::spawn(async move {
        let mut relayed = 0usize;
        while let Some(encoded) = batches.recv().await {
            match serializer.deserialize_batch(&encoded.payload) {
                Ok(batch) => {
                    relayed += batch.len();
                    info!(
                        "relayed batch {} ({} txs, {} bytes, commitment {})",
                        encoded.batch_id,
                        encoded.transaction_count,
                        encoded.payload.len(),
                        encoded.commitment
                    );
                }
                Err(e) => error!("relay could not decode batch {}: {}", encoded.batch_id, e),
            }
        }
        relayed
    });

    let scheduler = PublishScheduler::new(Arc::clone(&sequencer), scheduler_config)
        .spawn(&tokio::runtime::Handle::current());

    for amount in 1..=300u64 {
        if amount == 120 {
            info!("\n=== Halting sequencer ===");
            sequencer.shut_down();
        }
        if amount == 200 {
            info!("\n=== Restarting sequencer with {} pending ===", sequencer.pending_count());
            sequencer.start();
        }
        sequencer.add_transaction("0xalice", "0xbob", amount);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;

    let report = scheduler.stop().await;
    info!("\n=== Scheduler report ===");
    info!("{:?}", report);

    let stats = sequencer.stats();
    drop(sequencer);

    let relayed = relay.await.unwrap_or_default();
    info!("relayed {} transactions, {} still pending", relayed, stats.pending);
}
