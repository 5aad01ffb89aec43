use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use dashkit_types::TxHash;

/// In-memory cache of instant transaction hashes in front of the store.
#[derive(Debug, Default)]
pub struct InstantTransactionState {
    hashes: RwLock<HashSet<TxHash>>,
}

impl InstantTransactionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hash: &TxHash) -> bool {
        self.hashes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(hash)
    }

    /// Returns false if `hash` was already cached.
    pub fn insert(&self, hash: TxHash) -> bool {
        self.hashes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hash)
    }
}
