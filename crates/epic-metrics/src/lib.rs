//! # epic-metrics
//!
//! Counters, gauges and latency histograms for the Epicoin ledger, with a
//! JSON snapshot for status output.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod histogram;
mod registry;
mod snapshot;

pub use histogram::LatencyHistogram;
pub use registry::Metrics;
pub use snapshot::{LatencySummary, MetricsSnapshot};

/// Metric names recorded by the ledger crates
pub mod names {
    /// Blocks committed after genesis
    pub const BLOCKS_APPENDED: &str = "ledger.blocks_appended";
    /// Appends rejected for any reason
    pub const APPENDS_REJECTED: &str = "ledger.appends_rejected";
    /// Transactions committed in appended blocks
    pub const TXS_COMMITTED: &str = "ledger.transactions_committed";
    /// Chain height after the last append
    pub const HEIGHT: &str = "ledger.height";
    /// Time spent holding the commit lock
    pub const APPEND_LATENCY: &str = "ledger.append_us";
    /// Pending transactions
    pub const POOL_SIZE: &str = "txpool.size";
    /// Pending transactions dropped by lock-height expiry
    pub const POOL_EXPIRED: &str = "txpool.expired";
}

/// Time a block of code into a latency histogram
#[macro_export]
macro_rules! timed {
    ($metrics:expr, $name:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        $metrics.observe_us($name, start.elapsed().as_micros() as u64);
        result
    }};
}
