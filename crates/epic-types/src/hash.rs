//! Identifier types (TxHash, BlockHash, Address)
//!
//! Hashes travel as hex strings in the JSON records the ledger receives, and
//! the ledger never re-derives them, so they are kept as opaque strings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from any string-like value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow as str
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Check if empty
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Consume into the inner string
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Transaction hash (hex string, unique within the ledger's lifetime)
    TxHash
);

string_id!(
    /// Block hash (hex string)
    BlockHash
);

string_id!(
    /// Account address
    Address
);

/// Length of a hex-encoded SHA-256 digest
pub const HASH_HEX_LEN: usize = 64;

impl BlockHash {
    /// The predecessor reference carried by the genesis block
    pub fn zero() -> Self {
        Self("0".repeat(HASH_HEX_LEN))
    }

    /// Check if this is the all-zero reference
    pub fn is_zero(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b == b'0')
    }
}

/// SHA-256 of `data`, hex encoded (lowercase, no prefix)
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(sha256_hex(b"abc").len(), HASH_HEX_LEN);
    }

    #[test]
    fn test_zero_block_hash() {
        let zero = BlockHash::zero();
        assert_eq!(zero.as_str().len(), HASH_HEX_LEN);
        assert!(zero.is_zero());
        assert!(!BlockHash::from("00ab").is_zero());
        assert!(!BlockHash::default().is_zero());
    }

    #[test]
    fn test_is_empty_ignores_whitespace() {
        assert!(TxHash::from("").is_empty());
        assert!(TxHash::from("   ").is_empty());
        assert!(!TxHash::from("abc").is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let hash = TxHash::from("abc");
        assert_eq!(serde_json::to_string(&hash).unwrap(), "\"abc\"");
        let back: TxHash = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_display_and_debug() {
        let addr = Address::from("alice");
        assert_eq!(addr.to_string(), "alice");
        assert_eq!(format!("{:?}", addr), "Address(alice)");
    }
}
