//! Metrics registry

use crate::LatencyHistogram;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe registry of named counters, gauges and latency histograms.
///
/// Names are `'static` so call sites use the constants in [`crate::names`].
#[derive(Default)]
pub struct Metrics {
    counters: RwLock<HashMap<&'static str, Arc<AtomicU64>>>,
    gauges: RwLock<HashMap<&'static str, Arc<AtomicI64>>>,
    latencies: RwLock<HashMap<&'static str, Arc<LatencyHistogram>>>,
}

/// Fetch a slot under the read lock, falling back to the write lock to create it
fn slot<T: Default>(map: &RwLock<HashMap<&'static str, Arc<T>>>, name: &'static str) -> Arc<T> {
    if let Some(existing) = map.read().get(name) {
        return Arc::clone(existing);
    }
    Arc::clone(map.write().entry(name).or_default())
}

impl Metrics {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to a counter
    pub fn incr(&self, name: &'static str, delta: u64) {
        slot(&self.counters, name).fetch_add(delta, Ordering::Relaxed);
    }

    /// Set a gauge
    pub fn set_gauge(&self, name: &'static str, value: i64) {
        slot(&self.gauges, name).store(value, Ordering::Relaxed);
    }

    /// Move a gauge by `delta`. Concurrent adjustments never lose updates,
    /// unlike racing [`set_gauge`](Self::set_gauge) calls.
    pub fn adjust_gauge(&self, name: &'static str, delta: i64) {
        slot(&self.gauges, name).fetch_add(delta, Ordering::Relaxed);
    }

    /// Record a duration in microseconds
    pub fn observe_us(&self, name: &'static str, micros: u64) {
        slot(&self.latencies, name).observe(micros);
    }

    /// Current counter value
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.counters.read().get(name).map(|c| c.load(Ordering::Relaxed))
    }

    /// Current gauge value
    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.read().get(name).map(|g| g.load(Ordering::Relaxed))
    }

    /// Histogram for a name, if any observation was recorded
    pub fn latency(&self, name: &str) -> Option<Arc<LatencyHistogram>> {
        self.latencies.read().get(name).cloned()
    }

    pub(crate) fn counters(&self) -> Vec<(&'static str, u64)> {
        self.counters
            .read()
            .iter()
            .map(|(k, v)| (*k, v.load(Ordering::Relaxed)))
            .collect()
    }

    pub(crate) fn gauges(&self) -> Vec<(&'static str, i64)> {
        self.gauges
            .read()
            .iter()
            .map(|(k, v)| (*k, v.load(Ordering::Relaxed)))
            .collect()
    }

    pub(crate) fn latencies(&self) -> Vec<(&'static str, Arc<LatencyHistogram>)> {
        self.latencies
            .read()
            .iter()
            .map(|(k, v)| (*k, Arc::clone(v)))
            .collect()
    }
}
