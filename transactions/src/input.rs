//! Transaction inputs.

use dashkit_types::TxHash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a previous transaction output.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Outpoint {
    pub hash: TxHash,
    pub index: u32,
}

impl Outpoint {
    pub fn new(hash: TxHash, index: u32) -> Self {
        Self { hash, index }
    }

    /// The null outpoint spent by coinbase inputs.
    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.index == u32::MAX
    }
}

impl fmt::Debug for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.hash, self.index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub previous_output: Outpoint,
    pub signature_script: Vec<u8>,
    pub sequence: u32,
    /// Hash of the transaction this input belongs to.
    pub transaction_hash: TxHash,
}

impl Input {
    pub fn new(previous_output: Outpoint, signature_script: Vec<u8>, sequence: u32) -> Self {
        Self {
            previous_output,
            signature_script,
            sequence,
            transaction_hash: TxHash::ZERO,
        }
    }
}
