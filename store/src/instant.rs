//! InstantSend lock storage trait.

use crate::StoreError;
use dashkit_types::TxHash;

/// Hashes of transactions holding an accepted InstantSend lock.
pub trait InstantLockStore {
    fn is_instant(&self, hash: &TxHash) -> Result<bool, StoreError>;

    /// Record `hash` as instant-final. Idempotent.
    fn add_instant(&self, hash: &TxHash) -> Result<(), StoreError>;
}
