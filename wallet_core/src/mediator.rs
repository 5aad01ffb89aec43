//! Double-spend adjudication.

use std::sync::Arc;

use dashkit_store::{DashStore, StoreError};
use dashkit_transactions::{FullTransaction, Transaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Store the received transaction and invalidate every conflict.
    Accept,
    /// Keep the stored conflicts; drop the received transaction.
    Ignore,
}

/// Decides between a received transaction and stored transactions that
/// spend one of the same outpoints.
///
/// Precedence: received in a block, then a conflict in a block, then a
/// conflict instant-locked, then received instant-locked. With none of
/// those the first-seen transaction stays.
pub struct TransactionMediator {
    store: Arc<dyn DashStore>,
}

impl TransactionMediator {
    pub fn new(store: Arc<dyn DashStore>) -> Self {
        Self { store }
    }

    /// On [`ConflictResolution::Ignore`], each conflict is stamped with the
    /// received hash so the caller can persist the marker.
    ///
    /// `received_locked` carries a verified lock that is not yet recorded
    /// in the store.
    pub fn resolve(
        &self,
        received: &FullTransaction,
        received_locked: bool,
        conflicts: &mut [Transaction],
    ) -> Result<ConflictResolution, StoreError> {
        let resolution = self.decide(received, received_locked, conflicts)?;
        if resolution == ConflictResolution::Ignore {
            for conflict in conflicts.iter_mut() {
                conflict.conflicting_tx_hash = Some(received.hash());
            }
        }
        Ok(resolution)
    }

    fn decide(
        &self,
        received: &FullTransaction,
        received_locked: bool,
        conflicts: &[Transaction],
    ) -> Result<ConflictResolution, StoreError> {
        if conflicts.is_empty() || received.header.is_confirmed() {
            return Ok(ConflictResolution::Accept);
        }
        if conflicts.iter().any(Transaction::is_confirmed) {
            return Ok(ConflictResolution::Ignore);
        }
        for conflict in conflicts {
            if self.store.is_instant(&conflict.data_hash)? {
                return Ok(ConflictResolution::Ignore);
            }
        }
        if received_locked || self.store.is_instant(&received.hash())? {
            return Ok(ConflictResolution::Accept);
        }
        Ok(ConflictResolution::Ignore)
    }
}
