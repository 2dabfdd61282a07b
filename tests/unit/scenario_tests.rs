use rollup_sequencer::{Sequencer, SequencerError, SettlementBridge};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    fn add_five(sequencer: &Sequencer) {
        for i in 0..5u64 {
            sequencer.add_transaction("0xuser1", "0xuser2", i + 1);
        }
    }

    // --- One sequencer walked through publish, halt and restart ---

    #[test]
    fn test_publish_halt_restart_walkthrough() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Sequencer::new(bridge.clone());

        // Live: five transfers go out in one batch.
        add_five(&sequencer);
        assert_eq!(sequencer.transactions().len(), 5);
        assert!(sequencer.publish_batch().is_ok());
        assert_eq!(bridge.batches_received(), 1);
        assert_eq!(sequencer.transactions().len(), 0);

        // Halted: intake continues, publish is refused.
        sequencer.shut_down();
        assert_eq!(sequencer.transactions().len(), 0);
        add_five(&sequencer);
        assert_eq!(sequencer.transactions().len(), 5);
        let result = sequencer.publish_batch();
        assert!(matches!(result, Err(SequencerError::NotLive { .. })));
        assert_eq!(sequencer.transactions().len(), 5);
        assert_eq!(bridge.batches_received(), 1);

        // Live again: the backlog goes out.
        sequencer.start();
        assert_eq!(sequencer.transactions().len(), 5);
        assert!(sequencer.publish_batch().is_ok());
        assert_eq!(sequencer.transactions().len(), 0);
        assert_eq!(bridge.batches_received(), 2);
        let restarted_batches = bridge
            .events_since(1)
            .iter()
            .filter(|e| e.is_batch_received())
            .count();
        assert_eq!(restarted_batches, 1);
    }

    #[test]
    fn test_backlog_from_halt_is_in_next_batch() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Sequencer::new(bridge.clone());

        sequencer.shut_down();
        add_five(&sequencer);
        let backlog = sequencer.transactions();
        sequencer.start();
        sequencer.add_transaction("0xuser2", "0xuser1", 99);
        assert!(sequencer.publish_batch().is_ok());

        let batches = bridge.received_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 6);
        assert_eq!(&batches[0].transactions[..5], backlog.as_slice());
        assert_eq!(batches[0].transactions[5].amount(), 99);
    }

    #[test]
    fn test_stats_after_walkthrough() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Sequencer::new(bridge);

        add_five(&sequencer);
        assert!(sequencer.publish_batch().is_ok());
        sequencer.shut_down();
        add_five(&sequencer);
        assert!(sequencer.publish_batch().is_err());
        sequencer.start();
        assert!(sequencer.publish_batch().is_ok());

        let stats = sequencer.stats();
        assert_eq!(stats.transactions_accepted, 10);
        assert_eq!(stats.batches_published, 2);
        assert_eq!(stats.transactions_published, 10);
        assert_eq!(stats.rejected_while_halted, 1);
        assert_eq!(stats.downstream_failures, 0);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_stats_serialize_to_json() {
        let bridge = Arc::new(SettlementBridge::new());
        let sequencer = Sequencer::new(bridge);
        sequencer.shut_down();
        let json = serde_json::to_value(sequencer.stats());
        assert!(json.is_ok());
        let value = json.unwrap_or(serde_json::Value::Null);
        assert_eq!(value.get("status").and_then(|v| v.as_str()), Some("halted"));
        assert_eq!(value.get("pending").and_then(|v| v.as_u64()), Some(0));
    }
}
