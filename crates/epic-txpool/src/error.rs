//! Transaction pool error types

use epic_types::{StructuralError, TxHash};
use thiserror::Error;

/// Transaction pool errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxPoolError {
    /// A pending transaction already uses this hash
    #[error("transaction already pending: {0}")]
    DuplicateHash(TxHash),

    /// Pool is full
    #[error("pool is full (max size: {0})")]
    PoolFull(usize),

    /// Transaction is missing required fields
    #[error("malformed transaction: {0}")]
    Malformed(#[from] StructuralError),
}

/// Result type for transaction pool operations
pub type TxPoolResult<T> = Result<T, TxPoolError>;
