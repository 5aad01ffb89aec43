//! Transaction outputs.

use dashkit_types::TxHash;
use serde::{Deserialize, Serialize};

use crate::script::{self, ScriptType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Amount in duffs.
    pub value: u64,
    pub index: u32,
    pub locking_script: Vec<u8>,
    pub script_type: ScriptType,
    /// Key hash, script hash or public key extracted from the locking script.
    pub key_hash: Option<Vec<u8>>,
    /// Derivation path of the wallet key this output pays to.
    pub public_key_path: Option<String>,
    pub change_output: bool,
    pub transaction_hash: TxHash,
}

impl Output {
    /// Builds an output, classifying its locking script.
    pub fn new(value: u64, index: u32, locking_script: Vec<u8>) -> Self {
        let (script_type, key_hash) = script::classify(&locking_script);
        Self {
            value,
            index,
            locking_script,
            script_type,
            key_hash,
            public_key_path: None,
            change_output: false,
            transaction_hash: TxHash::ZERO,
        }
    }

    pub fn is_mine(&self) -> bool {
        self.public_key_path.is_some()
    }
}
