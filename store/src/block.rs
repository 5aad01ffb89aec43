//! Block header storage trait.

use crate::StoreError;
use dashkit_types::{Block, BlockHash};

/// Headers persisted by the generic sync engine, read by the Dash layer.
pub trait BlockStore {
    fn block(&self, hash: &BlockHash) -> Result<Option<Block>, StoreError>;

    /// The block at the tip of the best chain.
    fn last_block(&self) -> Result<Option<Block>, StoreError>;

    /// Insert or replace a block.
    fn put_block(&self, block: &Block) -> Result<(), StoreError>;
}
