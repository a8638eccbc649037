//! # epic-chain
//!
//! Single-node ledger core for Epicoin.
//!
//! - [`Ledger`]: the canonical block sequence, starting at the genesis block,
//!   with an atomic append that updates the index and prunes the pool
//! - [`BlockchainIndex`]: derived lookups over committed blocks, owned by the
//!   ledger and read through [`IndexReader`]
//! - [`PoolHandle`]: pending pool access that refuses committed hashes
//! - [`BlockValidator`]: semantic check seam run before any state changes
//! - [`BlockTemplate`]: candidate assembly from pending transactions
//!
//! ## Example
//!
//! ```
//! use epic_chain::{BlockchainIndex, Ledger};
//! use epic_txpool::TxPool;
//!
//! let ledger = Ledger::new(BlockchainIndex::new(), TxPool::with_defaults()).unwrap();
//! assert_eq!(ledger.len(), 1);
//! assert_eq!(ledger.tip().height, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod assembler;
mod error;
mod genesis;
mod handle;
mod index;
mod ledger;
mod validator;
mod view;

pub use assembler::BlockTemplate;
pub use error::{IndexError, IndexResult, LedgerError, LedgerResult, ValidationError};
pub use genesis::{genesis_block, GENESIS_TIMESTAMP};
pub use handle::{IndexReader, PoolHandle};
pub use index::{BlockchainIndex, TxLocation};
pub use ledger::{AppendReceipt, Ledger};
pub use validator::{AcceptAll, BlockValidator, LinkageValidator};
pub use view::ChainView;
