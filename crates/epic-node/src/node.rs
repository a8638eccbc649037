//! Node orchestration for epic-node

use crate::config::NodeConfig;
use epic_chain::{
    AcceptAll, BlockValidator, BlockchainIndex, ChainView, Ledger, LedgerError, LinkageValidator,
    ValidationError,
};
use epic_metrics::{Metrics, MetricsSnapshot};
use epic_txpool::TxPool;
use epic_types::{Block, Transaction};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::interval;

/// Node error types
#[derive(Debug, Error)]
pub enum NodeError {
    /// Ledger error
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Import file is not valid JSON
    #[error("invalid import file: {0}")]
    Import(#[from] serde_json::Error),
}

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;

/// Validator selected by configuration
#[derive(Clone, Copy, Debug)]
pub enum NodeValidator {
    /// Accept every well-formed block
    Accept(AcceptAll),
    /// Require blocks to extend the tip
    Linkage(LinkageValidator),
}

impl BlockValidator for NodeValidator {
    fn validate(&self, candidate: &Block, chain: &ChainView<'_>) -> Result<(), ValidationError> {
        match self {
            Self::Accept(v) => v.validate(candidate, chain),
            Self::Linkage(v) => v.validate(candidate, chain),
        }
    }
}

/// Contents of an import file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ImportFile {
    /// Submitted to the pool first
    pub transactions: Vec<Transaction>,
    /// Appended in order afterwards
    pub blocks: Vec<Block>,
}

/// Outcome counts of an import
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Transactions accepted into the pool
    pub submitted: usize,
    /// Transactions refused by pool or ledger
    pub refused: usize,
    /// Blocks appended
    pub appended: usize,
    /// Blocks rejected
    pub rejected: usize,
}

/// Epicoin node: one ledger plus its pool and index
pub struct Node {
    config: NodeConfig,
    ledger: Ledger<NodeValidator>,
    metrics: Arc<Metrics>,
}

impl Node {
    /// Create a node with a fresh ledger at genesis
    pub fn new(config: NodeConfig) -> NodeResult<Self> {
        let validator = if config.validation.linkage {
            NodeValidator::Linkage(LinkageValidator)
        } else {
            NodeValidator::Accept(AcceptAll)
        };
        let metrics = Arc::new(Metrics::new());
        let pool = TxPool::new(config.pool_config());
        let ledger = Ledger::with_validator(BlockchainIndex::new(), pool, validator)?
            .with_metrics(Arc::clone(&metrics));

        tracing::info!(
            max_pool_size = config.pool.max_size,
            linkage = config.validation.linkage,
            "node created"
        );

        Ok(Self {
            config,
            ledger,
            metrics,
        })
    }

    /// Get the ledger
    pub fn ledger(&self) -> &Ledger<NodeValidator> {
        &self.ledger
    }

    /// Load an import file from disk and apply it
    pub fn import_file(&self, path: &Path) -> NodeResult<ImportReport> {
        tracing::info!("Importing from {:?}", path);
        let content = std::fs::read(path)?;
        let import: ImportFile = serde_json::from_slice(&content)?;
        Ok(self.import(import))
    }

    /// Submit the transactions, then append the blocks in order.
    ///
    /// Individual failures are logged and counted; they do not stop the
    /// import.
    pub fn import(&self, import: ImportFile) -> ImportReport {
        let mut report = ImportReport::default();

        for tx in import.transactions {
            let hash = tx.hash.clone();
            match self.ledger.submit_transaction(tx) {
                Ok(()) => report.submitted += 1,
                Err(e) => {
                    tracing::warn!(%hash, error = %e, "transaction refused");
                    report.refused += 1;
                }
            }
        }

        for block in import.blocks {
            match self.ledger.append(block) {
                Ok(_) => report.appended += 1,
                // Ledger already logged the rejection
                Err(_) => report.rejected += 1,
            }
        }

        tracing::info!(
            submitted = report.submitted,
            refused = report.refused,
            appended = report.appended,
            rejected = report.rejected,
            height = self.ledger.height(),
            "import finished"
        );
        report
    }

    /// Expire pending transactions and log a status line
    pub fn tick(&self) -> MetricsSnapshot {
        self.ledger.evict_expired();
        let tip = self.ledger.tip();
        tracing::info!(
            height = tip.height,
            tip = %tip.hash,
            pending = self.ledger.pool().len(),
            indexed_txs = self.ledger.index().tx_count(),
            "status"
        );
        let snapshot = MetricsSnapshot::capture(&self.metrics);
        snapshot.log();
        snapshot
    }

    /// Run the status loop until `shutdown` resolves
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = interval(self.config.status_interval());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epic_chain::genesis_block;
    use epic_types::{Address, TxHash, TxInput, TxOutput, LOCK_HEIGHT_PROPERTY};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tx(hash: &str) -> Transaction {
        let mut tx = Transaction::new(
            0,
            vec![TxInput {
                transaction_hash: TxHash::from("src"),
                address: Address::from("alice"),
                amount: 2,
            }],
            vec![TxOutput {
                address: Address::from("bob"),
                amount: 1,
            }],
            1,
        )
        .with_signature("sig", "pk");
        tx.hash = TxHash::from(hash);
        tx
    }

    fn linked_config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.validation.linkage = true;
        config
    }

    #[test]
    fn test_node_starts_at_genesis() {
        let node = Node::new(NodeConfig::default()).unwrap();
        assert_eq!(node.ledger().len(), 1);
        assert_eq!(*node.ledger().genesis(), genesis_block());
    }

    #[test]
    fn test_import_submits_then_appends() {
        let node = Node::new(linked_config()).unwrap();
        let genesis = genesis_block();
        let b1 = Block::new(1, genesis.hash.clone(), vec![tx("t1")], 1);
        let orphan = Block::new(7, genesis.hash.clone(), vec![tx("t3")], 2);

        let report = node.import(ImportFile {
            transactions: vec![tx("t1"), tx("t2"), tx("t2")],
            blocks: vec![b1, orphan],
        });

        assert_eq!(
            report,
            ImportReport {
                submitted: 2,
                refused: 1,
                appended: 1,
                rejected: 1,
            }
        );
        assert_eq!(node.ledger().len(), 2);
        assert_eq!(
            node.ledger().pending_snapshot().into_iter().map(|t| t.hash).collect::<Vec<_>>(),
            vec![TxHash::from("t2")]
        );
    }

    #[test]
    fn test_import_file_from_disk() {
        let genesis = genesis_block();
        let block = Block::new(1, genesis.hash.clone(), vec![tx("t1")], 1);
        let body = serde_json::json!({ "blocks": [block] });
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.to_string().as_bytes()).unwrap();

        let node = Node::new(NodeConfig::default()).unwrap();
        let report = node.import_file(file.path()).unwrap();

        assert_eq!(report.appended, 1);
        assert!(node.ledger().locate_transaction(&TxHash::from("t1")).is_some());
    }

    #[test]
    fn test_import_file_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let node = Node::new(NodeConfig::default()).unwrap();
        assert!(matches!(node.import_file(file.path()), Err(NodeError::Import(_))));
    }

    #[test]
    fn test_tick_expires_and_reports() {
        let node = Node::new(NodeConfig::default()).unwrap();
        node.ledger()
            .submit_transaction(tx("stale").with_property(LOCK_HEIGHT_PROPERTY, "1"))
            .unwrap();

        let snapshot = node.tick();

        assert!(node.ledger().pool().is_empty());
        assert_eq!(snapshot.counters.get(epic_metrics::names::POOL_EXPIRED), Some(&1));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let node = Node::new(NodeConfig::default()).unwrap();
        node.run(async {}).await;
        assert_eq!(node.ledger().len(), 1);
    }
}
