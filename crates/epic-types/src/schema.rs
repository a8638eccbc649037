//! Field schema for transaction and block records
//!
//! Every field of the JSON records is addressed by a stable identifier that
//! maps to `(version, serialized name)`. Identifiers never change; a later
//! schema version may introduce new identifiers or rename the serialized form.

/// Schema version understood by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 0;

/// Where a field lives inside a transaction record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldScope {
    /// Top-level transaction field
    Transaction,
    /// Field of an entry in `inputs`
    Input,
    /// Field of an entry in `outputs`
    Output,
}

/// Transaction field identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionField {
    /// Record format version
    Version,
    /// Ordered inputs
    Inputs,
    /// Ordered outputs
    Outputs,
    /// Fee paid to the block producer
    FeeAmount,
    /// Content-derived identifier
    Hash,
    /// Signature over the hash
    Signature,
    /// Signer public key
    PublicKey,
    /// Open-ended properties map
    Properties,
    /// Input: hash of the transaction that produced the spent output
    InputTransactionHash,
    /// Input: spending address
    InputAddress,
    /// Input: spent amount
    InputAmount,
    /// Output: receiving address
    OutputAddress,
    /// Output: received amount
    OutputAmount,
}

impl TransactionField {
    /// All identifiers, in declaration order
    pub const ALL: [TransactionField; 13] = [
        TransactionField::Version,
        TransactionField::Inputs,
        TransactionField::Outputs,
        TransactionField::FeeAmount,
        TransactionField::Hash,
        TransactionField::Signature,
        TransactionField::PublicKey,
        TransactionField::Properties,
        TransactionField::InputTransactionHash,
        TransactionField::InputAddress,
        TransactionField::InputAmount,
        TransactionField::OutputAddress,
        TransactionField::OutputAmount,
    ];

    /// Schema version that introduced the field
    pub const fn version(self) -> u32 {
        match self {
            TransactionField::Version
            | TransactionField::Inputs
            | TransactionField::Outputs
            | TransactionField::FeeAmount
            | TransactionField::Hash
            | TransactionField::Signature
            | TransactionField::PublicKey
            | TransactionField::Properties
            | TransactionField::InputTransactionHash
            | TransactionField::InputAddress
            | TransactionField::InputAmount
            | TransactionField::OutputAddress
            | TransactionField::OutputAmount => 0,
        }
    }

    /// Serialized name
    pub const fn name(self) -> &'static str {
        match self {
            TransactionField::Version => "version",
            TransactionField::Inputs => "inputs",
            TransactionField::Outputs => "outputs",
            TransactionField::FeeAmount => "feeAmount",
            TransactionField::Hash => "hash",
            TransactionField::Signature => "signature",
            TransactionField::PublicKey => "publicKey",
            TransactionField::Properties => "properties",
            TransactionField::InputTransactionHash => "transactionHash",
            TransactionField::InputAddress => "address",
            TransactionField::InputAmount => "amount",
            TransactionField::OutputAddress => "address",
            TransactionField::OutputAmount => "amount",
        }
    }

    /// Record the field belongs to
    pub const fn scope(self) -> FieldScope {
        match self {
            TransactionField::InputTransactionHash
            | TransactionField::InputAddress
            | TransactionField::InputAmount => FieldScope::Input,
            TransactionField::OutputAddress | TransactionField::OutputAmount => {
                FieldScope::Output
            }
            _ => FieldScope::Transaction,
        }
    }

    /// Check if the field exists in the given schema version
    pub const fn is_available_in(self, schema_version: u32) -> bool {
        self.version() <= schema_version
    }

    /// Resolve a serialized name within a scope.
    ///
    /// Names are only unique per scope (`address` is both an input and an
    /// output field), so the scope is mandatory.
    pub fn from_name(scope: FieldScope, name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.scope() == scope && field.name() == name)
    }
}

/// Block field identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockField {
    /// Record format version
    Version,
    /// Height claimed by the producer
    Height,
    /// Production time (unix millis)
    Timestamp,
    /// Committed transactions
    Transactions,
    /// Proof-of-work nonce
    Nonce,
    /// Hash of the predecessor
    PreviousHash,
    /// Block hash
    Hash,
    /// Open-ended properties map
    Properties,
}

impl BlockField {
    /// All identifiers, in declaration order
    pub const ALL: [BlockField; 8] = [
        BlockField::Version,
        BlockField::Height,
        BlockField::Timestamp,
        BlockField::Transactions,
        BlockField::Nonce,
        BlockField::PreviousHash,
        BlockField::Hash,
        BlockField::Properties,
    ];

    /// Schema version that introduced the field
    pub const fn version(self) -> u32 {
        0
    }

    /// Serialized name
    pub const fn name(self) -> &'static str {
        match self {
            BlockField::Version => "version",
            BlockField::Height => "height",
            BlockField::Timestamp => "timestamp",
            BlockField::Transactions => "transactions",
            BlockField::Nonce => "nonce",
            BlockField::PreviousHash => "previousHash",
            BlockField::Hash => "hash",
            BlockField::Properties => "properties",
        }
    }

    /// Check if the field exists in the given schema version
    pub const fn is_available_in(self, schema_version: u32) -> bool {
        self.version() <= schema_version
    }

    /// Resolve a serialized name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_transaction_names_unique_per_scope() {
        for scope in [FieldScope::Transaction, FieldScope::Input, FieldScope::Output] {
            let names: Vec<_> = TransactionField::ALL
                .iter()
                .filter(|f| f.scope() == scope)
                .map(|f| f.name())
                .collect();
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(names.len(), unique.len(), "duplicate name in {:?}", scope);
        }
    }

    #[test]
    fn test_scoped_lookup() {
        assert_eq!(
            TransactionField::from_name(FieldScope::Input, "address"),
            Some(TransactionField::InputAddress)
        );
        assert_eq!(
            TransactionField::from_name(FieldScope::Output, "address"),
            Some(TransactionField::OutputAddress)
        );
        assert_eq!(
            TransactionField::from_name(FieldScope::Transaction, "feeAmount"),
            Some(TransactionField::FeeAmount)
        );
        assert_eq!(TransactionField::from_name(FieldScope::Transaction, "address"), None);
    }

    #[test]
    fn test_block_lookup() {
        for field in BlockField::ALL {
            assert_eq!(BlockField::from_name(field.name()), Some(field));
        }
        assert_eq!(BlockField::from_name("difficulty"), None);
    }

    #[test]
    fn test_all_fields_available_in_current_version() {
        assert!(TransactionField::ALL
            .iter()
            .all(|f| f.is_available_in(CURRENT_SCHEMA_VERSION)));
        assert!(BlockField::ALL
            .iter()
            .all(|f| f.is_available_in(CURRENT_SCHEMA_VERSION)));
    }
}
