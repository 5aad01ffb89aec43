//! Locking script classification.

use serde::{Deserialize, Serialize};

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;
const OP_EQUAL: u8 = 0x87;
const OP_RETURN: u8 = 0x6a;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptType {
    #[default]
    Unknown,
    P2pkh,
    P2pk,
    P2sh,
    NullData,
}

impl ScriptType {
    /// Outputs whose filter element is the full public key or the script
    /// hash rather than a key hash. A wallet receiving one must regenerate
    /// its bloom filter so the spending input is matched.
    pub fn is_irregular(&self) -> bool {
        matches!(self, Self::P2pk | Self::P2sh)
    }
}

/// Classify `script` and extract its key hash, script hash or public key.
pub fn classify(script: &[u8]) -> (ScriptType, Option<Vec<u8>>) {
    match script {
        [OP_DUP, OP_HASH160, 0x14, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if hash.len() == 20 => {
            (ScriptType::P2pkh, Some(hash.to_vec()))
        }
        [OP_HASH160, 0x14, hash @ .., OP_EQUAL] if hash.len() == 20 => {
            (ScriptType::P2sh, Some(hash.to_vec()))
        }
        [len, key @ .., OP_CHECKSIG]
            if (*len == 33 || *len == 65) && key.len() == *len as usize =>
        {
            (ScriptType::P2pk, Some(key.to_vec()))
        }
        [OP_RETURN, ..] => (ScriptType::NullData, None),
        _ => (ScriptType::Unknown, None),
    }
}

/// Standard pay-to-public-key-hash locking script.
pub fn p2pkh(key_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[OP_DUP, OP_HASH160, 0x14]);
    script.extend_from_slice(key_hash);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}
