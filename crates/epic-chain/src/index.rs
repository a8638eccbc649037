//! Blockchain index
//!
//! A derived projection over the committed block sequence:
//! - transaction hash -> (block height, position in block)
//! - block hash -> height
//! - address -> hashes of committed transactions naming it, in commit order
//!
//! No balances are derived; nothing downstream needs them yet.

use crate::error::{IndexError, IndexResult};
use epic_types::{Address, Block, BlockHash, TxHash};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Where a committed transaction lives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TxLocation {
    /// Height (position in the ledger) of the containing block
    pub height: u64,
    /// Position within the block's transaction list
    pub position: usize,
}

#[derive(Default)]
struct IndexState {
    /// Number of blocks folded in so far
    blocks: u64,
    tx_locations: HashMap<TxHash, TxLocation>,
    block_heights: HashMap<BlockHash, u64>,
    by_address: HashMap<Address, Vec<TxHash>>,
}

impl IndexState {
    /// Check that `block` can be folded in at `height` without touching state
    fn check(&self, height: u64, block: &Block) -> IndexResult<()> {
        if height != self.blocks {
            return Err(IndexError::HeightMismatch {
                expected: self.blocks,
                got: height,
            });
        }
        if let Some(&existing) = self.block_heights.get(&block.hash) {
            return Err(IndexError::DuplicateBlock {
                hash: block.hash.clone(),
                height: existing,
            });
        }

        let mut in_block = HashSet::with_capacity(block.tx_count());
        for hash in block.tx_hashes() {
            if let Some(location) = self.tx_locations.get(hash) {
                return Err(IndexError::DuplicateTransaction {
                    hash: hash.clone(),
                    height: location.height,
                });
            }
            if !in_block.insert(hash) {
                return Err(IndexError::DuplicateTransaction {
                    hash: hash.clone(),
                    height,
                });
            }
        }
        Ok(())
    }

    /// Fold a checked block in. Infallible so a failure can never leave a
    /// block half applied.
    fn apply(&mut self, height: u64, block: &Block) {
        for (position, tx) in block.transactions.iter().enumerate() {
            self.tx_locations
                .insert(tx.hash.clone(), TxLocation { height, position });
            for address in tx.addresses() {
                self.by_address
                    .entry(address.clone())
                    .or_default()
                    .push(tx.hash.clone());
            }
        }
        self.block_heights.insert(block.hash.clone(), height);
        self.blocks += 1;
    }
}

/// Queryable projection over committed blocks.
///
/// Only the owning [`Ledger`](crate::Ledger) mutates it, through
/// `process_block` and `rebuild`, both all-or-nothing.
#[derive(Default)]
pub struct BlockchainIndex {
    state: RwLock<IndexState>,
}

impl BlockchainIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one block, committed at `height`, into the index.
    ///
    /// On error the index is unchanged. Replaying an already indexed block is
    /// rejected, not ignored.
    pub(crate) fn process_block(&self, height: u64, block: &Block) -> IndexResult<()> {
        let mut state = self.state.write();
        state.check(height, block)?;
        state.apply(height, block);
        tracing::trace!(height, hash = %block.hash, txs = block.tx_count(), "block indexed");
        Ok(())
    }

    /// Rebuild from the full committed sequence, position 0 first.
    ///
    /// The new state is built aside and swapped in only if every block folds
    /// cleanly; on error the previous state stays in place.
    pub(crate) fn rebuild(&self, blocks: &[Arc<Block>]) -> IndexResult<()> {
        let mut fresh = IndexState::default();
        for (height, block) in (0u64..).zip(blocks) {
            fresh.check(height, block)?;
            fresh.apply(height, block);
        }
        *self.state.write() = fresh;
        tracing::debug!(blocks = blocks.len(), "index rebuilt");
        Ok(())
    }

    /// Locate a committed transaction
    pub fn locate(&self, hash: &TxHash) -> Option<TxLocation> {
        self.state.read().tx_locations.get(hash).copied()
    }

    /// Check if a transaction hash is committed
    pub fn contains_tx(&self, hash: &TxHash) -> bool {
        self.state.read().tx_locations.contains_key(hash)
    }

    /// Height of a committed block
    pub fn height_of(&self, hash: &BlockHash) -> Option<u64> {
        self.state.read().block_heights.get(hash).copied()
    }

    /// Committed transactions naming `address`, in commit order
    pub fn transactions_for(&self, address: &Address) -> Vec<TxHash> {
        self.state
            .read()
            .by_address
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of blocks folded in
    pub fn indexed_blocks(&self) -> u64 {
        self.state.read().blocks
    }

    /// Number of committed transactions
    pub fn tx_count(&self) -> usize {
        self.state.read().tx_locations.len()
    }
}
