use crate::recorder::TestRecorder;
use rollup_sequencer::{Sequencer, SettlementBridge};
use std::sync::Arc;

fn make_sequencer() -> (Arc<SettlementBridge>, Sequencer) {
    let bridge = Arc::new(SettlementBridge::new());
    let sequencer = Sequencer::new(bridge.clone());
    (bridge, sequencer)
}

#[test]
fn test_full_cycle_emits_counters_and_gauges() {
    let recorder = TestRecorder::default();
    let (_, sequencer) = make_sequencer();

    metrics::with_local_recorder(&recorder, || {
        sequencer.add_transaction("0xalice", "0xbob", 10);
        sequencer.shut_down();
        assert!(sequencer.publish_batch().is_err());
        sequencer.add_transaction("0xalice", "0xbob", 20);
        sequencer.start();
        assert!(sequencer.publish_batch().is_ok());
    });

    assert_eq!(
        recorder.counter("sequencer_transactions_accepted_total"),
        Some(2)
    );
    assert_eq!(recorder.counter("sequencer_batches_published_total"), Some(1));
    assert_eq!(
        recorder.counter("sequencer_transactions_published_total"),
        Some(2)
    );
    assert_eq!(recorder.gauge("sequencer_live"), Some(1.0));
    assert_eq!(recorder.gauge("sequencer_pending_transactions"), Some(0.0));
    assert_eq!(recorder.counter("sequencer_downstream_failures_total"), None);
}

#[test]
fn test_halt_sets_live_gauge_to_zero() {
    let recorder = TestRecorder::default();
    let (_, sequencer) = make_sequencer();

    metrics::with_local_recorder(&recorder, || {
        sequencer.add_transaction("0xalice", "0xbob", 1);
        sequencer.shut_down();
    });

    assert_eq!(recorder.gauge("sequencer_live"), Some(0.0));
    assert_eq!(recorder.gauge("sequencer_pending_transactions"), Some(1.0));
}

#[test]
fn test_downstream_failure_is_counted() {
    let recorder = TestRecorder::default();
    let (bridge, sequencer) = make_sequencer();
    bridge.set_available(false);

    metrics::with_local_recorder(&recorder, || {
        sequencer.add_transaction("0xalice", "0xbob", 1);
        assert!(sequencer.publish_batch().is_err());
    });

    assert_eq!(
        recorder.counter("sequencer_downstream_failures_total"),
        Some(1)
    );
    assert_eq!(recorder.counter("sequencer_batches_published_total"), None);
}
