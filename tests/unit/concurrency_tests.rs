use rollup_sequencer::{Sequencer, SettlementBridge};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCERS: u64 = 8;
    const PER_PRODUCER: u64 = 500;

    fn spawn_producers(sequencer: &Arc<Sequencer>) -> Vec<thread::JoinHandle<()>> {
        (0..PRODUCERS)
            .map(|p| {
                let sequencer = Arc::clone(sequencer);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        sequencer.add_transaction(format!("0xproducer{p}"), "0xsink", i + 1);
                    }
                })
            })
            .collect()
    }

    #[test]
    fn test_every_transaction_delivered_exactly_once() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Arc::new(Sequencer::new(bridge.clone()));
        let done = Arc::new(AtomicBool::new(false));

        let publisher = {
            let sequencer = Arc::clone(&sequencer);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    let _ = sequencer.publish_batch();
                    thread::yield_now();
                }
            })
        };

        for handle in spawn_producers(&sequencer) {
            assert!(handle.join().is_ok());
        }
        done.store(true, Ordering::SeqCst);
        assert!(publisher.join().is_ok());
        assert!(sequencer.publish_batch().is_ok());

        let total = PRODUCERS * PER_PRODUCER;
        assert_eq!(sequencer.pending_count(), 0);
        assert_eq!(bridge.transactions_received(), total);

        let mut seen = HashSet::new();
        for batch in bridge.received_batches() {
            for tx in &batch.transactions {
                assert!(seen.insert(tx.sequence_num()), "duplicate delivery");
            }
        }
        assert_eq!(seen.len() as u64, total);
        assert!(seen.iter().all(|&seq| seq < total));
    }

    #[test]
    fn test_batches_are_ordered_by_sequence() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Arc::new(Sequencer::new(bridge.clone()));

        let producers = spawn_producers(&sequencer);
        for _ in 0..20 {
            let _ = sequencer.publish_batch();
            thread::yield_now();
        }
        for handle in producers {
            assert!(handle.join().is_ok());
        }
        assert!(sequencer.publish_batch().is_ok());

        let sequence: Vec<u64> = bridge
            .received_batches()
            .iter()
            .flat_map(|b| b.transactions.iter().map(|t| t.sequence_num()))
            .collect();
        assert!(sequence.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sequence.len() as u64, PRODUCERS * PER_PRODUCER);
    }

    #[test]
    fn test_toggling_lifecycle_never_loses_transactions() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Arc::new(Sequencer::new(bridge.clone()));
        let done = Arc::new(AtomicBool::new(false));

        let toggler = {
            let sequencer = Arc::clone(&sequencer);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut halt = true;
                while !done.load(Ordering::SeqCst) {
                    if halt {
                        sequencer.shut_down();
                    } else {
                        sequencer.start();
                    }
                    halt = !halt;
                    let _ = sequencer.publish_batch();
                    thread::yield_now();
                }
            })
        };

        for handle in spawn_producers(&sequencer) {
            assert!(handle.join().is_ok());
        }
        done.store(true, Ordering::SeqCst);
        assert!(toggler.join().is_ok());

        sequencer.start();
        assert!(sequencer.publish_batch().is_ok());
        assert_eq!(bridge.transactions_received(), PRODUCERS * PER_PRODUCER);
        assert_eq!(sequencer.pending_count(), 0);
    }
}
