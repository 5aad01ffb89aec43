//! Ancestor lookup over stored headers.

use std::sync::Arc;

use dashkit_store::{BlockStore, StoreError};
use dashkit_types::Block;

/// Walks `previous_block_hash` links through a [`BlockStore`].
#[derive(Clone)]
pub struct BlockHelper {
    store: Arc<dyn BlockStore + Send + Sync>,
}

impl BlockHelper {
    pub fn new(store: Arc<dyn BlockStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// The block `count` steps behind `block`, or `None` once the stored
    /// chain runs out.
    pub fn previous(&self, block: &Block, count: u32) -> Result<Option<Block>, StoreError> {
        let mut current = block.clone();
        for _ in 0..count {
            match self.store.block(&current.header.previous_block_hash)? {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}
