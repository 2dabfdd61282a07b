use rollup_sequencer::{ReceiverEvent, Sequencer, SettlementBridge};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLISH_EVERY: u64 = 20;

    /// Drive `rounds` intakes, publishing every `PUBLISH_EVERY` of them, and
    /// return how many `TransactionReceived` events each publish produced.
    fn run_phase(sequencer: &Sequencer, counter: &AtomicU64, rounds: u64) -> Vec<u64> {
        let mut delivered = Vec::new();
        let mut seen = counter.load(Ordering::SeqCst);
        for i in 0..rounds {
            if i % PUBLISH_EVERY == 0 {
                let _ = sequencer.publish_batch();
                let total = counter.load(Ordering::SeqCst);
                delivered.push(total - seen);
                seen = total;
            }
            sequencer.add_transaction("0xuser1", "0xuser2", i + 1);
        }
        delivered
    }

    #[test]
    fn test_throughput_drops_to_zero_while_halted_and_recovers() {
        let counter = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&counter);
        let bridge = Arc::new(SettlementBridge::new());
        bridge.subscribe(Arc::new(move |event: &ReceiverEvent| {
            if event.is_transaction_received() {
                sink.fetch_add(1, Ordering::SeqCst);
            }
        }));
        let sequencer = Sequencer::new(bridge.clone());

        let before = run_phase(&sequencer, &counter, 200);
        assert_eq!(before.len(), 10);
        assert_eq!(before[0], 0);
        assert!(before[1..].iter().all(|&n| n == PUBLISH_EVERY));

        sequencer.shut_down();
        let during = run_phase(&sequencer, &counter, 80);
        assert!(during.iter().all(|&n| n == 0));
        // 20 left over from the live phase plus 80 collected while halted.
        assert_eq!(sequencer.pending_count(), 100);

        sequencer.start();
        let after = run_phase(&sequencer, &counter, 200);
        assert_eq!(after[0], 100);
        assert!(after[1..].iter().all(|&n| n == PUBLISH_EVERY));

        // Everything but the final 20 intakes has been delivered exactly once.
        assert_eq!(bridge.transactions_received(), 480 - PUBLISH_EVERY);
        assert_eq!(sequencer.pending_count() as u64, PUBLISH_EVERY);
    }
}
