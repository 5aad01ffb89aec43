//! Transaction hash type.
//!
//! Hashes are kept in internal (little-endian wire) byte order. `Display`
//! renders the byte-reversed hex form used by block explorers and RPC.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A 32-byte transaction hash (double SHA-256 of the serialized transaction).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a hash from slice of exactly 32 bytes in internal order.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Parse the byte-reversed hex representation (explorer order).
    pub fn from_reversed_hex(s: &str) -> Result<Self, TypesError> {
        let mut bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        bytes.reverse();
        Self::from_slice(&bytes)
    }

    /// Byte-reversed hex representation (explorer order).
    pub fn reversed_hex(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({}\u{2026})", &self.reversed_hex()[..8])
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reversed_hex())
    }
}

impl From<[u8; 32]> for TxHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
