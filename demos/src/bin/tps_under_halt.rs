// demos/src/bin/tps_under_halt.rs
//
// Replays a throughput run across a sequencer outage.
//
// A producer submits transfers in three phases: while the sequencer is live,
// while it is halted, and after it has been restarted. Every 20 submissions
// the producer asks for a publish. While halted those requests are refused
// and transactions pile up in the buffer; the first publish after the restart
// carries the whole backlog.
//
// Transactions-per-second is measured from the bridge's TransactionReceived
// events, the same way a settlement-layer observer would.
//
// Run this demo with:
//   cargo run --bin tps_under_halt
//   (from the demos directory)

use rollup_sequencer::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Level, info, warn};

const PUBLISH_EVERY: u64 = 20;
const PHASES: [(&str, u64, bool); 3] = [
    ("live", 200, true),
    ("halted", 80, false),
    ("restarted", 200, true),
];

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    info!("TPS under halt demo");

    let bridge = Arc::new(SettlementBridge::new());
    let delivered = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&delivered);
    bridge.subscribe(Arc::new(move |event: &ReceiverEvent| {
        if event.is_transaction_received() {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }));

    let sequencer = Sequencer::new(bridge.clone());
    let started = Instant::now();
    let mut submitted = 0u64;

    for (name, count, live) in PHASES {
        if live {
            sequencer.start();
        } else {
            sequencer.shut_down();
        }
        info!("\n=== Phase: {} ({} transactions) ===", name, count);

        let phase_start = Instant::now();
        let delivered_before = delivered.load(Ordering::Relaxed);

        for _ in 0..count {
            submitted += 1;
            sequencer.add_transaction("0xuser1", "0xuser2", submitted);
            if submitted % PUBLISH_EVERY == 0 {
                match sequencer.publish_batch() {
                    Ok(Some(receipt)) => info!(
                        "published batch {} with {} transactions",
                        receipt.batch_id, receipt.transaction_count
                    ),
                    Ok(None) => {}
                    Err(e) if e.is_not_live() => {
                        info!("publish refused, {} pending", sequencer.pending_count())
                    }
                    Err(e) => warn!("publish failed: {}", e),
                }
            }
            std::thread::sleep(Duration::from_micros(200));
        }

        let phase_delivered = delivered.load(Ordering::Relaxed) - delivered_before;
        let seconds = phase_start.elapsed().as_secs_f64().max(f64::EPSILON);
        info!(
            "phase {}: delivered {} transactions, {:.0} TPS",
            name,
            phase_delivered,
            phase_delivered as f64 / seconds
        );
    }

    let seconds = started.elapsed().as_secs_f64().max(f64::EPSILON);
    let total = delivered.load(Ordering::Relaxed);
    info!("\n=== Summary ===");
    info!("submitted:  {}", submitted);
    info!("delivered:  {}", total);
    info!("pending:    {}", sequencer.pending_count());
    info!("batches:    {}", bridge.batches_received());
    info!("overall:    {:.0} TPS", total as f64 / seconds);

    match serde_json::to_string_pretty(&sequencer.stats()) {
        Ok(json) => info!("final stats:\n{}", json),
        Err(e) => warn!("could not render stats: {}", e),
    }
}
