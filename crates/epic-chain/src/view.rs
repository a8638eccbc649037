//! Consistent read view over ledger, index and pool

use crate::index::{BlockchainIndex, TxLocation};
use epic_txpool::TxPool;
use epic_types::{Block, Transaction, TxHash};
use std::sync::Arc;

/// Borrowed view of the ledger state while the commit lock is held for
/// reading (or, inside `append`, for writing).
///
/// Everything reachable through a view belongs to the same committed state:
/// no block is half applied.
pub struct ChainView<'a> {
    pub(crate) blocks: &'a [Arc<Block>],
    pub(crate) index: &'a BlockchainIndex,
    pub(crate) pool: &'a TxPool,
}

impl<'a> ChainView<'a> {
    /// Committed blocks, genesis first
    pub fn blocks(&self) -> &'a [Arc<Block>] {
        self.blocks
    }

    /// Latest committed block
    pub fn tip(&self) -> &'a Block {
        // The ledger is created with genesis in place and never shrinks
        &self.blocks[self.blocks.len() - 1]
    }

    /// Position the next appended block will take
    pub fn next_height(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Index snapshot
    pub fn index(&self) -> &'a BlockchainIndex {
        self.index
    }

    /// Locate a committed transaction
    pub fn locate(&self, hash: &TxHash) -> Option<TxLocation> {
        self.index.locate(hash)
    }

    /// Pending transactions in arrival order
    pub fn pending(&self) -> Vec<Transaction> {
        self.pool.snapshot()
    }
}
