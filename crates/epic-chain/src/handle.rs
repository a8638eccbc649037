//! Locked access to the ledger-owned index and pool
//!
//! Every call takes the read side of the commit lock, so a lookup runs
//! either wholly before or wholly after any append. A caller never sees a
//! block's transactions as committed while they are still pending.
//!
//! The handles use recursive reads so they stay usable from inside
//! [`Ledger::with_view`](crate::Ledger::with_view).

use crate::error::{LedgerError, LedgerResult};
use crate::index::{BlockchainIndex, TxLocation};
use epic_metrics::{names, Metrics};
use epic_txpool::{PoolConfig, TxPool};
use epic_types::{Address, Block, BlockHash, Transaction, TxHash};
use parking_lot::RwLock;
use std::sync::Arc;

/// Read-only lookups on the blockchain index
#[derive(Clone, Copy)]
pub struct IndexReader<'a> {
    pub(crate) chain: &'a RwLock<Vec<Arc<Block>>>,
    pub(crate) index: &'a BlockchainIndex,
}

impl IndexReader<'_> {
    /// Locate a committed transaction
    pub fn locate(&self, hash: &TxHash) -> Option<TxLocation> {
        let _chain = self.chain.read_recursive();
        self.index.locate(hash)
    }

    /// Check if a transaction hash is committed
    pub fn contains_tx(&self, hash: &TxHash) -> bool {
        let _chain = self.chain.read_recursive();
        self.index.contains_tx(hash)
    }

    /// Height of a committed block
    pub fn height_of(&self, hash: &BlockHash) -> Option<u64> {
        let _chain = self.chain.read_recursive();
        self.index.height_of(hash)
    }

    /// Committed transactions naming `address`, in commit order
    pub fn transactions_for(&self, address: &Address) -> Vec<TxHash> {
        let _chain = self.chain.read_recursive();
        self.index.transactions_for(address)
    }

    /// Number of blocks folded in
    pub fn indexed_blocks(&self) -> u64 {
        let _chain = self.chain.read_recursive();
        self.index.indexed_blocks()
    }

    /// Number of committed transactions
    pub fn tx_count(&self) -> usize {
        let _chain = self.chain.read_recursive();
        self.index.tx_count()
    }
}

/// Access to the pending pool.
///
/// Insertion refuses hashes that are already committed.
#[derive(Clone, Copy)]
pub struct PoolHandle<'a> {
    pub(crate) chain: &'a RwLock<Vec<Arc<Block>>>,
    pub(crate) index: &'a BlockchainIndex,
    pub(crate) pool: &'a TxPool,
    pub(crate) metrics: &'a Metrics,
}

impl PoolHandle<'_> {
    /// Add a pending transaction
    pub fn add(&self, tx: Transaction) -> LedgerResult<()> {
        let _chain = self.chain.read_recursive();
        if self.index.contains_tx(&tx.hash) {
            return Err(LedgerError::AlreadyCommitted(tx.hash));
        }
        self.pool.add(tx)?;
        self.metrics.adjust_gauge(names::POOL_SIZE, 1);
        Ok(())
    }

    /// Pending transactions in arrival order
    pub fn snapshot(&self) -> Vec<Transaction> {
        let _chain = self.chain.read_recursive();
        self.pool.snapshot()
    }

    /// Pending transaction by hash
    pub fn get(&self, hash: &TxHash) -> Option<Transaction> {
        let _chain = self.chain.read_recursive();
        self.pool.get(hash)
    }

    /// Check if a hash is pending
    pub fn contains(&self, hash: &TxHash) -> bool {
        let _chain = self.chain.read_recursive();
        self.pool.contains(hash)
    }

    /// Number of pending transactions
    pub fn len(&self) -> usize {
        let _chain = self.chain.read_recursive();
        self.pool.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        self.pool.config()
    }
}
