//! In-process recorder that keeps the last value of every counter and gauge.

use metrics::{
    Counter, CounterFn, Gauge, GaugeFn, Histogram, Key, KeyName, Metadata, Recorder,
    SharedString, Unit,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Slot(AtomicU64);

impl CounterFn for Slot {
    fn increment(&self, value: u64) {
        self.0.fetch_add(value, Ordering::SeqCst);
    }

    fn absolute(&self, value: u64) {
        self.0.fetch_max(value, Ordering::SeqCst);
    }
}

impl GaugeFn for Slot {
    fn increment(&self, value: f64) {
        self.update(|current| current + value);
    }

    fn decrement(&self, value: f64) {
        self.update(|current| current - value);
    }

    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::SeqCst);
    }
}

impl Slot {
    fn update(&self, f: impl Fn(f64) -> f64) {
        let _ = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some(f(f64::from_bits(bits)).to_bits())
            });
    }
}

/// Records counters and gauges by metric name.
#[derive(Debug, Default)]
pub struct TestRecorder {
    counters: Mutex<HashMap<String, Arc<Slot>>>,
    gauges: Mutex<HashMap<String, Arc<Slot>>>,
}

impl TestRecorder {
    fn cell(map: &Mutex<HashMap<String, Arc<Slot>>>, key: &Key) -> Arc<Slot> {
        let mut map = map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(map.entry(key.name().to_string()).or_default())
    }

    /// Current value of a counter, `None` if it was never registered.
    pub fn counter(&self, name: &str) -> Option<u64> {
        let map = self.counters.lock().ok()?;
        map.get(name).map(|cell| cell.0.load(Ordering::SeqCst))
    }

    /// Current value of a gauge, `None` if it was never registered.
    pub fn gauge(&self, name: &str) -> Option<f64> {
        let map = self.gauges.lock().ok()?;
        map.get(name)
            .map(|cell| f64::from_bits(cell.0.load(Ordering::SeqCst)))
    }
}

impl Recorder for TestRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {
    }

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Self::cell(&self.counters, key))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Self::cell(&self.gauges, key))
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
