//! Masternode list synchronisation checkpoint.

use serde::{Deserialize, Serialize};

use crate::BlockHash;

/// The singleton checkpoint row: the block hash the next `getmnlistd` must use
/// as its base. An all-zero hash means "sync from genesis".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MasternodeListState {
    pub base_block_hash: BlockHash,
}

impl MasternodeListState {
    pub fn new(base_block_hash: BlockHash) -> Self {
        Self { base_block_hash }
    }

    pub fn genesis() -> Self {
        Self::new(BlockHash::ZERO)
    }

    pub fn is_genesis(&self) -> bool {
        self.base_block_hash.is_zero()
    }
}
