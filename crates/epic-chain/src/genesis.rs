//! Genesis block

use epic_types::{Block, BlockHash};

/// Timestamp stamped on the genesis block
pub const GENESIS_TIMESTAMP: u64 = 0;

/// Build the genesis block.
///
/// Height 0, no transactions, all-zero predecessor, sealed with its content
/// hash. The result is the same on every call and every process.
pub fn genesis_block() -> Block {
    Block::new(0, BlockHash::zero(), Vec::new(), GENESIS_TIMESTAMP)
}
