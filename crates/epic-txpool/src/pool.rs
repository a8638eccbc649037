//! Transaction pool implementation

use crate::error::{TxPoolError, TxPoolResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use epic_types::{Transaction, TxHash};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of pending transactions
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_size: 10_000 }
    }
}

/// Transaction with pool bookkeeping
#[derive(Clone, Debug)]
pub struct PooledTransaction {
    /// The pending transaction
    pub tx: Transaction,
    /// Arrival sequence number, unique per pool
    pub arrival: u64,
}

/// Pending transactions keyed by hash.
///
/// Every operation is individually atomic. Keeping the pool consistent with
/// committed blocks is the ledger's job: it prunes committed hashes while
/// holding its commit lock.
pub struct TxPool {
    /// Configuration
    config: PoolConfig,
    /// All transactions by hash
    by_hash: DashMap<TxHash, PooledTransaction>,
    /// Reserved slots, bounded by `config.max_size`
    len: AtomicUsize,
    /// Next arrival sequence number
    next_arrival: AtomicU64,
}

impl TxPool {
    /// Create new pool with config
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            by_hash: DashMap::new(),
            len: AtomicUsize::new(0),
            next_arrival: AtomicU64::new(0),
        }
    }

    /// Create pool with default config
    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::default())
    }

    /// Pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Add a transaction.
    ///
    /// A hash that is already pending is rejected and the existing entry is
    /// left untouched.
    pub fn add(&self, tx: Transaction) -> TxPoolResult<()> {
        tx.check_structure()?;

        // Reserve a slot first so concurrent adds cannot overshoot the limit
        if self.len.fetch_add(1, Ordering::SeqCst) >= self.config.max_size {
            self.len.fetch_sub(1, Ordering::SeqCst);
            return Err(TxPoolError::PoolFull(self.config.max_size));
        }

        match self.by_hash.entry(tx.hash.clone()) {
            Entry::Occupied(existing) => {
                self.len.fetch_sub(1, Ordering::SeqCst);
                Err(TxPoolError::DuplicateHash(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                let arrival = self.next_arrival.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(hash = %tx.hash, arrival, "pending transaction added");
                slot.insert(PooledTransaction { tx, arrival });
                Ok(())
            }
        }
    }

    /// Remove transaction by hash; absent hashes are ignored
    pub fn remove_by_hash(&self, hash: &TxHash) -> Option<Transaction> {
        let (_, pooled) = self.by_hash.remove(hash)?;
        self.len.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(hash = %hash, "pending transaction removed");
        Some(pooled.tx)
    }

    /// Drop every transaction that must commit before a height the chain
    /// can no longer reach.
    ///
    /// A transaction stamped with lock height `h` is valid only in blocks
    /// below `h`; once the next block to be appended sits at `h` or above it
    /// is dropped. Returns the dropped hashes.
    pub fn evict_expired(&self, next_height: u64) -> Vec<TxHash> {
        let expired: Vec<TxHash> = self
            .by_hash
            .iter()
            .filter(|entry| matches!(entry.tx.lock_height(), Some(h) if h <= next_height))
            .map(|entry| entry.key().clone())
            .collect();

        expired
            .into_iter()
            .filter(|hash| self.remove_by_hash(hash).is_some())
            .inspect(|hash| tracing::debug!(hash = %hash, next_height, "pending transaction expired"))
            .collect()
    }

    /// Pending transactions in arrival order
    pub fn snapshot(&self) -> Vec<Transaction> {
        let mut pooled: Vec<PooledTransaction> =
            self.by_hash.iter().map(|entry| entry.value().clone()).collect();
        pooled.sort_by_key(|p| p.arrival);
        pooled.into_iter().map(|p| p.tx).collect()
    }

    /// Get transaction by hash
    pub fn get(&self, hash: &TxHash) -> Option<Transaction> {
        self.by_hash.get(hash).map(|entry| entry.tx.clone())
    }

    /// Check if a hash is pending
    pub fn contains(&self, hash: &TxHash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Get total number of transactions
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// Check if pool is empty
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Clear all transactions
    pub fn clear(&self) {
        let hashes: Vec<TxHash> = self.by_hash.iter().map(|e| e.key().clone()).collect();
        for hash in hashes {
            self.remove_by_hash(&hash);
        }
    }
}

impl Default for TxPool {
    fn default() -> Self {
        Self::with_defaults()
    }
}
