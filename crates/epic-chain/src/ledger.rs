//! The ledger: canonical block sequence plus atomic commit
//!
//! Appending a block is one unit under the commit lock:
//!
//! ```text
//!   write lock ─┬─ structural check
//!               ├─ validator
//!               ├─ index.process_block   (all-or-nothing)
//!               ├─ push onto sequence
//!               └─ prune committed hashes from the pool
//! ```
//!
//! The index is updated before the push so that an index failure leaves no
//! recorded block behind. The ledger owns the index and pool once injected;
//! every outside read goes through the read side of the same lock, so no
//! reader observes a block without its index effects or with its
//! transactions still pending.

use crate::assembler::BlockTemplate;
use crate::error::LedgerResult;
use crate::genesis::genesis_block;
use crate::handle::{IndexReader, PoolHandle};
use crate::index::{BlockchainIndex, TxLocation};
use crate::validator::{AcceptAll, BlockValidator};
use crate::view::ChainView;
use epic_metrics::{names, timed, Metrics};
use epic_txpool::TxPool;
use epic_types::{Address, Block, BlockHash, Transaction, TxHash};
use parking_lot::RwLock;
use std::sync::Arc;

/// Outcome of a successful append
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppendReceipt {
    /// Position the block took
    pub height: u64,
    /// Hash of the appended block
    pub hash: BlockHash,
    /// Transactions committed
    pub tx_count: usize,
    /// Committed transactions that were still pending and got pruned
    pub pruned: usize,
}

/// Append-only block repository.
///
/// The index and pool are built by the caller and handed over at
/// construction. From then on the ledger is their only writer, and
/// [`index`](Self::index) and [`pool`](Self::pool) are the only ways to
/// reach them.
pub struct Ledger<V: BlockValidator = AcceptAll> {
    /// Committed blocks, genesis at 0. The lock doubles as the commit lock.
    chain: RwLock<Vec<Arc<Block>>>,
    index: BlockchainIndex,
    pool: TxPool,
    validator: V,
    metrics: Arc<Metrics>,
}

impl Ledger<AcceptAll> {
    /// Initialize a ledger holding only the genesis block
    pub fn new(index: BlockchainIndex, pool: TxPool) -> LedgerResult<Self> {
        Self::with_validator(index, pool, AcceptAll)
    }
}

impl<V: BlockValidator> Ledger<V> {
    /// Initialize a ledger holding only the genesis block, checking every
    /// later block with `validator`.
    ///
    /// Whatever the injected index held before is replaced by the genesis
    /// projection. Transactions already in the pool stay pending.
    pub fn with_validator(index: BlockchainIndex, pool: TxPool, validator: V) -> LedgerResult<Self> {
        let genesis = Arc::new(genesis_block());
        let chain = vec![genesis];
        index.rebuild(&chain)?;

        tracing::info!(hash = %chain[0].hash, pending = pool.len(), "ledger initialized with genesis block");

        let ledger = Self {
            chain: RwLock::new(chain),
            index,
            pool,
            validator,
            metrics: Arc::new(Metrics::new()),
        };
        ledger.seed_gauges();
        Ok(ledger)
    }

    /// Record into a shared metrics registry instead of a private one
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self.seed_gauges();
        self
    }

    fn seed_gauges(&self) {
        let chain = self.chain.read();
        self.metrics.set_gauge(names::HEIGHT, chain.len() as i64 - 1);
        self.metrics.set_gauge(names::POOL_SIZE, self.pool.len() as i64);
    }

    /// Append `block` as the new tip.
    ///
    /// Either the block is stored, indexed and its transactions pruned from
    /// the pool, or nothing changes and the error is returned.
    pub fn append(&self, block: Block) -> LedgerResult<AppendReceipt> {
        let result = timed!(self.metrics, names::APPEND_LATENCY, {
            let mut chain = self.chain.write();
            self.commit(&mut chain, block)
        });

        match &result {
            Ok(receipt) => {
                self.metrics.incr(names::BLOCKS_APPENDED, 1);
                self.metrics.incr(names::TXS_COMMITTED, receipt.tx_count as u64);
            }
            Err(err) => {
                self.metrics.incr(names::APPENDS_REJECTED, 1);
                tracing::warn!(error = %err, "block rejected");
            }
        }
        result
    }

    fn commit(&self, chain: &mut Vec<Arc<Block>>, block: Block) -> LedgerResult<AppendReceipt> {
        block.check_structure()?;

        let view = ChainView {
            blocks: chain.as_slice(),
            index: &self.index,
            pool: &self.pool,
        };
        self.validator.validate(&block, &view)?;

        let height = chain.len() as u64;
        self.index.process_block(height, &block)?;

        // Nothing below can fail: the block is now committed
        let block = Arc::new(block);
        chain.push(Arc::clone(&block));
        let pruned = block
            .tx_hashes()
            .filter(|hash| self.pool.remove_by_hash(hash).is_some())
            .count();

        self.metrics.set_gauge(names::HEIGHT, height as i64);
        self.metrics.adjust_gauge(names::POOL_SIZE, -(pruned as i64));

        tracing::info!(
            height,
            hash = %block.hash,
            txs = block.tx_count(),
            pruned,
            "block committed"
        );

        Ok(AppendReceipt {
            height,
            hash: block.hash.clone(),
            tx_count: block.tx_count(),
            pruned,
        })
    }

    /// Snapshot of the committed sequence, genesis first
    pub fn blocks(&self) -> Vec<Arc<Block>> {
        self.chain.read().clone()
    }

    /// Run `f` against a consistent view of chain, index and pool.
    ///
    /// Appends wait until `f` returns, so keep it short.
    pub fn with_view<R>(&self, f: impl FnOnce(&ChainView<'_>) -> R) -> R {
        let chain = self.chain.read();
        let view = ChainView {
            blocks: chain.as_slice(),
            index: &self.index,
            pool: &self.pool,
        };
        f(&view)
    }

    /// Build a candidate extending the tip from up to `max_transactions`
    /// pending transactions. The candidate is not appended.
    pub fn assemble_candidate(&self, max_transactions: usize, timestamp: u64) -> Option<Block> {
        let template = BlockTemplate::new(max_transactions, timestamp);
        self.with_view(|view| template.assemble(view))
    }

    /// Number of committed blocks, genesis included
    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    /// Always false: genesis is present from construction
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Height of the tip
    pub fn height(&self) -> u64 {
        self.len() as u64 - 1
    }

    /// Latest committed block
    pub fn tip(&self) -> Arc<Block> {
        self.with_view(|view| Arc::clone(&view.blocks()[view.blocks().len() - 1]))
    }

    /// Genesis block
    pub fn genesis(&self) -> Arc<Block> {
        Arc::clone(&self.chain.read()[0])
    }

    /// Block at `height`
    pub fn block_at(&self, height: u64) -> Option<Arc<Block>> {
        let index = usize::try_from(height).ok()?;
        self.chain.read().get(index).cloned()
    }

    /// Block by hash
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<Arc<Block>> {
        let chain = self.chain.read();
        let height = self.index.height_of(hash)?;
        chain.get(height as usize).cloned()
    }

    /// Locate a committed transaction
    pub fn locate_transaction(&self, hash: &TxHash) -> Option<TxLocation> {
        self.index().locate(hash)
    }

    /// Committed transaction by hash
    pub fn transaction(&self, hash: &TxHash) -> Option<Transaction> {
        let chain = self.chain.read();
        let location = self.index.locate(hash)?;
        chain
            .get(location.height as usize)?
            .transactions
            .get(location.position)
            .cloned()
    }

    /// Committed transactions naming `address`, in commit order
    pub fn transactions_for(&self, address: &Address) -> Vec<TxHash> {
        self.index().transactions_for(address)
    }

    /// Submit a transaction to the pool.
    ///
    /// Hashes already committed are refused, so the pool can never hold a
    /// committed transaction.
    pub fn submit_transaction(&self, tx: Transaction) -> LedgerResult<()> {
        self.pool().add(tx)
    }

    /// Pending transactions in arrival order
    pub fn pending_snapshot(&self) -> Vec<Transaction> {
        self.pool().snapshot()
    }

    /// Drop pending transactions whose lock height the next block reaches
    pub fn evict_expired(&self) -> Vec<TxHash> {
        let chain = self.chain.read();
        let evicted = self.pool.evict_expired(chain.len() as u64);
        if !evicted.is_empty() {
            self.metrics.incr(names::POOL_EXPIRED, evicted.len() as u64);
            self.metrics.adjust_gauge(names::POOL_SIZE, -(evicted.len() as i64));
            tracing::info!(count = evicted.len(), next_height = chain.len(), "expired pending transactions");
        }
        evicted
    }

    /// Rebuild the index from the committed sequence
    pub fn reindex(&self) -> LedgerResult<()> {
        let chain = self.chain.write();
        self.index.rebuild(&chain)?;
        tracing::info!(blocks = chain.len(), "index rebuilt from ledger");
        Ok(())
    }

    /// Index lookups, each serialized against appends
    pub fn index(&self) -> IndexReader<'_> {
        IndexReader {
            chain: &self.chain,
            index: &self.index,
        }
    }

    /// Pending pool, each call serialized against appends
    pub fn pool(&self) -> PoolHandle<'_> {
        PoolHandle {
            chain: &self.chain,
            index: &self.index,
            pool: &self.pool,
            metrics: &self.metrics,
        }
    }

    /// Metrics registry
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}
