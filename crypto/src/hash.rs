//! SHA-256 based hashing.

use dashkit_types::TxHash;
use sha2::{Digest, Sha256};

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA-256 applied twice (`SHA256d`).
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

pub fn double_sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    sha256(&sha256_multi(parts))
}

/// Hash a serialized transaction to produce its `TxHash`.
pub fn hash_transaction(tx_bytes: &[u8]) -> TxHash {
    TxHash::new(double_sha256(tx_bytes))
}
