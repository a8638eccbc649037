//! Canonical JSON encoding/decoding for blocks and transactions.
//!
//! Field order follows the struct declarations and property maps are sorted,
//! so equal records always encode to identical bytes.

use crate::block::Block;
use crate::error::StructuralResult;
use crate::transaction::Transaction;

/// Encode a block to canonical JSON bytes.
pub fn encode_block(block: &Block) -> StructuralResult<Vec<u8>> {
    Ok(serde_json::to_vec(block)?)
}

/// Decode a block from JSON bytes.
///
/// Missing required fields surface as [`StructuralError::Malformed`](crate::StructuralError).
pub fn decode_block(bytes: &[u8]) -> StructuralResult<Block> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Encode a transaction to canonical JSON bytes.
pub fn encode_transaction(tx: &Transaction) -> StructuralResult<Vec<u8>> {
    Ok(serde_json::to_vec(tx)?)
}

/// Decode a transaction from JSON bytes.
pub fn decode_transaction(bytes: &[u8]) -> StructuralResult<Transaction> {
    Ok(serde_json::from_slice(bytes)?)
}
