//! # epic-types
//!
//! Core record types for the Epicoin ledger.
//!
//! This crate provides:
//! - [`Transaction`](transaction::Transaction) - Value transfer, identified by its hash
//! - [`Block`](block::Block) - Batch of transactions plus producer metadata
//! - [`TransactionField`](schema::TransactionField) / [`BlockField`](schema::BlockField) -
//!   Versioned field schema shared by every component
//! - [`codec`] - Canonical JSON encoding

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod codec;
pub mod error;
pub mod hash;
pub mod schema;
pub mod transaction;

// Re-export commonly used types
pub use block::Block;
pub use error::{StructuralError, StructuralResult};
pub use hash::{sha256_hex, Address, BlockHash, TxHash, HASH_HEX_LEN};
pub use schema::{BlockField, FieldScope, TransactionField, CURRENT_SCHEMA_VERSION};
pub use transaction::{Transaction, TxInput, TxOutput, LOCK_HEIGHT_PROPERTY};
