//! Ledger, index and validation error types

use epic_txpool::TxPoolError;
use epic_types::{BlockHash, StructuralError, TxHash};
use thiserror::Error;

/// Failure to fold a block into the blockchain index.
///
/// The index is left exactly as it was before the failing call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Block offered at a position other than the next one
    #[error("index height mismatch: expected {expected}, got {got}")]
    HeightMismatch {
        /// Next position the index expects
        expected: u64,
        /// Position offered
        got: u64,
    },

    /// Block hash already indexed
    #[error("block {hash} already indexed at height {height}")]
    DuplicateBlock {
        /// Offending block hash
        hash: BlockHash,
        /// Height it was first indexed at
        height: u64,
    },

    /// Transaction hash already committed (or repeated within the block)
    #[error("transaction {hash} already committed at height {height}")]
    DuplicateTransaction {
        /// Offending transaction hash
        hash: TxHash,
        /// Height it was first committed at
        height: u64,
    },
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Semantic rejection of a candidate block by a [`BlockValidator`](crate::BlockValidator)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Claimed height does not match the position it would take
    #[error("block height {got} does not extend chain (expected {expected})")]
    HeightMismatch {
        /// Next position in the chain
        expected: u64,
        /// Height claimed by the block
        got: u64,
    },

    /// Predecessor reference does not point at the current tip
    #[error("previous hash {got} does not match tip {expected}")]
    PreviousHashMismatch {
        /// Hash of the current tip
        expected: BlockHash,
        /// Reference carried by the block
        got: BlockHash,
    },

    /// Any other rule
    #[error("block rejected: {0}")]
    Rejected(String),
}

/// Ledger errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Block or transaction missing required fields; nothing was recorded
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Rejected by the block validator; nothing was recorded
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Index update failed during append; nothing was recorded
    #[error("append failed: {0}")]
    Index(#[from] IndexError),

    /// Transaction pool rejected a submission
    #[error("txpool error: {0}")]
    Pool(#[from] TxPoolError),

    /// Submitted transaction is already part of the chain
    #[error("transaction {0} is already committed")]
    AlreadyCommitted(TxHash),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
