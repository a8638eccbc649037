//! Candidate block assembly from pending transactions

use crate::view::ChainView;
use epic_types::Block;

/// Parameters for building a candidate block on the current tip
#[derive(Clone, Debug)]
pub struct BlockTemplate {
    /// Maximum transactions taken from the pool
    pub max_transactions: usize,
    /// Timestamp stamped on the candidate
    pub timestamp: u64,
}

impl BlockTemplate {
    /// Create a template
    pub fn new(max_transactions: usize, timestamp: u64) -> Self {
        Self {
            max_transactions,
            timestamp,
        }
    }

    /// Build a sealed candidate extending the tip of `chain`, taking pending
    /// transactions in arrival order.
    ///
    /// Returns `None` when there is nothing to include.
    pub fn assemble(&self, chain: &ChainView<'_>) -> Option<Block> {
        let mut pending = chain.pending();
        pending.truncate(self.max_transactions);
        if pending.is_empty() {
            return None;
        }
        Some(Block::new(
            chain.next_height(),
            chain.tip().hash.clone(),
            pending,
            self.timestamp,
        ))
    }
}
