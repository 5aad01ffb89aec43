//! Block hash, header and stored block types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A 32-byte block hash (X11 of the serialized header on Dash).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHash([u8; 32]);

impl Default for BlockHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl BlockHash {
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

    pub fn reversed_hex(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        hex::encode(bytes)
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({}\u{2026})", &self.reversed_hex()[..8])
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reversed_hex())
    }
}

/// An 80-byte block header plus its externally computed hash.
///
/// Header hashing (X11) belongs to the generic header sync loop; the hash is
/// carried alongside the fields rather than recomputed here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub previous_block_hash: BlockHash,
    pub merkle_root: [u8; 32],
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    pub header_hash: BlockHash,
}

/// A header persisted at a known height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub height: u32,
    /// Set once a wallet transaction has been matched in this block.
    pub has_transactions: bool,
}

impl Block {
    pub fn new(header: BlockHeader, height: u32) -> Self {
        Self {
            header,
            height,
            has_transactions: false,
        }
    }

    pub fn hash(&self) -> BlockHash {
        self.header.header_hash
    }

    pub fn bits(&self) -> u32 {
        self.header.bits
    }

    pub fn timestamp(&self) -> u32 {
        self.header.timestamp
    }
}
