//! Structural error types

use crate::schema::{BlockField, TransactionField};
use thiserror::Error;

/// A record is missing a required field or cannot be parsed at all.
///
/// Raised before any state is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Required transaction field is empty
    #[error("transaction field `{}` is missing", .0.name())]
    MissingTransactionField(TransactionField),

    /// Required field of an input or output entry is empty
    #[error("transaction {hash}: `{}` of entry {index} is missing", .field.name())]
    MissingEntryField {
        /// Hash of the owning transaction
        hash: String,
        /// Position of the entry in `inputs`/`outputs`
        index: usize,
        /// The missing field
        field: TransactionField,
    },

    /// Required block field is empty
    #[error("block field `{}` is missing", .0.name())]
    MissingBlockField(BlockField),

    /// Same transaction hash listed twice in one block
    #[error("transaction {0} appears more than once in the block")]
    RepeatedTransaction(String),

    /// Record could not be decoded
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for StructuralError {
    fn from(err: serde_json::Error) -> Self {
        StructuralError::Malformed(err.to_string())
    }
}

/// Result type for structural checks
pub type StructuralResult<T> = Result<T, StructuralError>;
