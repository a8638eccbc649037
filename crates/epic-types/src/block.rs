//! Block types for the Epicoin ledger

use crate::error::{StructuralError, StructuralResult};
use crate::hash::{sha256_hex, BlockHash, TxHash};
use crate::schema::BlockField;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A batch of transactions plus producer metadata.
///
/// Linkage (`height`, `previous_hash`) and proof fields (`nonce`, `hash`) are
/// carried as supplied; checking them belongs to a block validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Record format version
    pub version: u32,
    /// Height claimed by the producer
    pub height: u64,
    /// Production time (unix millis)
    #[serde(default)]
    pub timestamp: u64,
    /// Committed transactions, in block order
    pub transactions: Vec<Transaction>,
    /// Proof-of-work nonce
    pub nonce: u64,
    /// Hash of the predecessor
    pub previous_hash: BlockHash,
    /// Block hash
    pub hash: BlockHash,
    /// Open-ended properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Block {
    /// Create a block on top of `previous_hash` and seal it with its content hash
    pub fn new(
        height: u64,
        previous_hash: BlockHash,
        transactions: Vec<Transaction>,
        timestamp: u64,
    ) -> Self {
        let mut block = Self {
            version: 0,
            height,
            timestamp,
            transactions,
            nonce: 0,
            previous_hash,
            hash: BlockHash::default(),
            properties: BTreeMap::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Content hash over the metadata and the ordered transaction hashes
    pub fn compute_hash(&self) -> BlockHash {
        let mut serialized = String::new();
        serialized.push_str(&self.version.to_string());
        serialized.push_str(&self.height.to_string());
        serialized.push_str(&self.timestamp.to_string());
        serialized.push_str(&self.nonce.to_string());
        serialized.push_str(self.previous_hash.as_str());
        for (key, value) in &self.properties {
            serialized.push_str(key);
            serialized.push_str(value);
        }
        for tx in &self.transactions {
            serialized.push_str(tx.hash.as_str());
        }
        BlockHash::new(sha256_hex(serialized.as_bytes()))
    }

    /// Get transaction count
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Hashes of the contained transactions, in block order
    pub fn tx_hashes(&self) -> impl Iterator<Item = &TxHash> {
        self.transactions.iter().map(|tx| &tx.hash)
    }

    /// Check if the block carries the genesis predecessor reference
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.previous_hash.is_zero()
    }

    /// Check that the block and every contained transaction is well formed
    pub fn check_structure(&self) -> StructuralResult<()> {
        if self.hash.is_empty() {
            return Err(StructuralError::MissingBlockField(BlockField::Hash));
        }
        if self.previous_hash.is_empty() {
            return Err(StructuralError::MissingBlockField(BlockField::PreviousHash));
        }

        let mut seen = HashSet::with_capacity(self.transactions.len());
        for tx in &self.transactions {
            tx.check_structure()?;
            if !seen.insert(&tx.hash) {
                return Err(StructuralError::RepeatedTransaction(tx.hash.to_string()));
            }
        }
        Ok(())
    }
}
