//! # epic-txpool
//!
//! Pending transaction pool for the Epicoin ledger.
//!
//! This crate provides:
//! - Hash-keyed storage of transactions awaiting a block
//! - Duplicate-hash rejection (never silent replacement)
//! - Removal by hash, tolerant of absent entries
//! - Arrival-ordered snapshots for block assembly
//! - Lock-height expiry
//!
//! ## Usage
//!
//! ```ignore
//! use epic_txpool::{TxPool, PoolConfig};
//!
//! let pool = TxPool::with_defaults();
//! pool.add(tx)?;
//! let pending = pool.snapshot();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod pool;

pub use error::{TxPoolError, TxPoolResult};
pub use pool::{PoolConfig, PooledTransaction, TxPool};
