//! Point-in-time export

use crate::Metrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one latency histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Observation count
    pub count: u64,
    /// Mean in microseconds
    pub mean_us: f64,
    /// Max in microseconds
    pub max_us: u64,
}

/// Snapshot of every registered metric, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Counter values
    pub counters: BTreeMap<String, u64>,
    /// Gauge values
    pub gauges: BTreeMap<String, i64>,
    /// Latency summaries
    pub latencies: BTreeMap<String, LatencySummary>,
}

impl MetricsSnapshot {
    /// Capture the current values
    pub fn capture(metrics: &Metrics) -> Self {
        Self {
            counters: metrics
                .counters()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            gauges: metrics
                .gauges()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            latencies: metrics
                .latencies()
                .into_iter()
                .map(|(k, h)| {
                    let summary = LatencySummary {
                        count: h.count(),
                        mean_us: h.mean_us(),
                        max_us: h.max_us(),
                    };
                    (k.to_string(), summary)
                })
                .collect(),
        }
    }

    /// Compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Emit one `info` event per metric
    pub fn log(&self) {
        for (name, value) in &self.counters {
            tracing::info!(metric = %name, value, "counter");
        }
        for (name, value) in &self.gauges {
            tracing::info!(metric = %name, value, "gauge");
        }
        for (name, s) in &self.latencies {
            tracing::info!(metric = %name, count = s.count, mean_us = s.mean_us, max_us = s.max_us, "latency");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_and_json() {
        let metrics = Metrics::new();
        metrics.incr("ledger.blocks_appended", 3);
        metrics.set_gauge("txpool.size", 7);
        metrics.observe_us("ledger.append_us", 120);

        let snapshot = MetricsSnapshot::capture(&metrics);
        assert_eq!(snapshot.counters["ledger.blocks_appended"], 3);
        assert_eq!(snapshot.gauges["txpool.size"], 7);
        assert_eq!(snapshot.latencies["ledger.append_us"].max_us, 120);

        let json = snapshot.to_json().unwrap();
        let back: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MetricsSnapshot::capture(&Metrics::new());
        assert_eq!(snapshot, MetricsSnapshot::default());
    }
}
