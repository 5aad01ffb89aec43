//! Instant-final transaction bookkeeping.

use std::sync::Arc;

use dashkit_messages::ISLockMessage;
use dashkit_store::DashStore;
use dashkit_transactions::FullTransaction;
use dashkit_types::TxHash;
use tracing::info;

use crate::{InstantSendError, InstantTransactionState};

pub struct InstantTransactionManager {
    store: Arc<dyn DashStore>,
    state: InstantTransactionState,
}

impl InstantTransactionManager {
    pub fn new(store: Arc<dyn DashStore>) -> Self {
        Self {
            store,
            state: InstantTransactionState::new(),
        }
    }

    pub fn is_instant(&self, hash: &TxHash) -> Result<bool, InstantSendError> {
        if self.state.contains(hash) {
            return Ok(true);
        }
        let instant = self.store.is_instant(hash)?;
        if instant {
            self.state.insert(*hash);
        }
        Ok(instant)
    }

    pub fn stored_transaction(
        &self,
        hash: &TxHash,
    ) -> Result<Option<FullTransaction>, InstantSendError> {
        Ok(self.store.full_transaction(hash)?)
    }

    /// Checks that `lock` may make `transaction` instant: every input is
    /// covered by the lock, and no other active transaction spending one of
    /// those inputs is already instant.
    pub fn check_lockable(
        &self,
        lock: &ISLockMessage,
        transaction: &FullTransaction,
    ) -> Result<(), InstantSendError> {
        if lock.tx_hash != transaction.hash() {
            return Err(InstantSendError::InputsNotCovered(transaction.hash()));
        }
        let covered = transaction
            .inputs
            .iter()
            .all(|input| lock.inputs.contains(&input.previous_output));
        if !covered {
            return Err(InstantSendError::InputsNotCovered(lock.tx_hash));
        }

        for conflict in self.store.conflicting_transactions(transaction)? {
            if self.is_instant(&conflict.data_hash)? {
                return Err(InstantSendError::ConflictingLock(conflict.data_hash));
            }
        }
        Ok(())
    }

    /// Returns false if `hash` was already instant.
    pub fn make_instant(&self, hash: &TxHash) -> Result<bool, InstantSendError> {
        if self.is_instant(hash)? {
            return Ok(false);
        }
        self.store.add_instant(hash)?;
        self.state.insert(*hash);
        info!(%hash, "transaction is instant");
        Ok(true)
    }
}
