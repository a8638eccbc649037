//! Transaction types for the Epicoin ledger

use crate::error::{StructuralError, StructuralResult};
use crate::hash::{sha256_hex, Address, TxHash};
use crate::schema::TransactionField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property carrying the height before which the transaction must commit
pub const LOCK_HEIGHT_PROPERTY: &str = "lockHeight";

/// Reference to a previously committed output being spent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    /// Hash of the transaction that produced the spent output
    pub transaction_hash: TxHash,
    /// Spending address
    pub address: Address,
    /// Spent amount
    pub amount: u64,
}

/// Value assigned to an address
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Receiving address
    pub address: Address,
    /// Received amount
    pub amount: u64,
}

/// A value transfer as received from a transaction source.
///
/// The hash, signature and public key are carried through untouched; the
/// ledger does not re-derive or verify them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Record format version
    pub version: u32,
    /// Ordered inputs
    pub inputs: Vec<TxInput>,
    /// Ordered outputs
    pub outputs: Vec<TxOutput>,
    /// Fee paid to the block producer
    #[serde(default)]
    pub fee_amount: u64,
    /// Content-derived identifier
    pub hash: TxHash,
    /// Signature over the hash
    pub signature: String,
    /// Signer public key
    pub public_key: String,
    /// Open-ended properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Transaction {
    /// Create an unsigned transaction whose hash is derived from its content
    pub fn new(version: u32, inputs: Vec<TxInput>, outputs: Vec<TxOutput>, fee_amount: u64) -> Self {
        let mut tx = Self {
            version,
            inputs,
            outputs,
            fee_amount,
            hash: TxHash::default(),
            signature: String::new(),
            public_key: String::new(),
            properties: BTreeMap::new(),
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Attach signature and public key
    pub fn with_signature(mut self, signature: impl Into<String>, public_key: impl Into<String>) -> Self {
        self.signature = signature.into();
        self.public_key = public_key.into();
        self
    }

    /// Set a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Content hash: inputs (source hash, address, amount) then outputs
    /// (address, amount), SHA-256, hex encoded.
    pub fn compute_hash(&self) -> TxHash {
        let mut serialized = String::new();
        for input in &self.inputs {
            serialized.push_str(input.transaction_hash.as_str());
            serialized.push_str(input.address.as_str());
            serialized.push_str(&input.amount.to_string());
        }
        for output in &self.outputs {
            serialized.push_str(output.address.as_str());
            serialized.push_str(&output.amount.to_string());
        }
        TxHash::new(sha256_hex(serialized.as_bytes()))
    }

    /// Height before which the transaction must be committed, if stamped
    pub fn lock_height(&self) -> Option<u64> {
        self.properties
            .get(LOCK_HEIGHT_PROPERTY)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Total amount over all outputs
    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|o| o.amount).fold(0u64, u64::saturating_add)
    }

    /// Addresses named by inputs or outputs, deduplicated, in first-seen order
    pub fn addresses(&self) -> Vec<&Address> {
        let mut seen: Vec<&Address> = Vec::new();
        let named = self
            .inputs
            .iter()
            .map(|i| &i.address)
            .chain(self.outputs.iter().map(|o| &o.address));
        for address in named {
            if !seen.contains(&address) {
                seen.push(address);
            }
        }
        seen
    }

    /// Check that every required field is present
    pub fn check_structure(&self) -> StructuralResult<()> {
        if self.hash.is_empty() {
            return Err(StructuralError::MissingTransactionField(TransactionField::Hash));
        }
        if self.signature.trim().is_empty() {
            return Err(StructuralError::MissingTransactionField(TransactionField::Signature));
        }
        if self.public_key.trim().is_empty() {
            return Err(StructuralError::MissingTransactionField(TransactionField::PublicKey));
        }
        for (index, input) in self.inputs.iter().enumerate() {
            let missing = if input.transaction_hash.is_empty() {
                Some(TransactionField::InputTransactionHash)
            } else if input.address.is_empty() {
                Some(TransactionField::InputAddress)
            } else {
                None
            };
            if let Some(field) = missing {
                return Err(StructuralError::MissingEntryField {
                    hash: self.hash.to_string(),
                    index,
                    field,
                });
            }
        }
        for (index, output) in self.outputs.iter().enumerate() {
            if output.address.is_empty() {
                return Err(StructuralError::MissingEntryField {
                    hash: self.hash.to_string(),
                    index,
                    field: TransactionField::OutputAddress,
                });
            }
        }
        Ok(())
    }
}
