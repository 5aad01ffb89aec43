//! Entry point for relayed `islock` messages.

use std::sync::{Arc, Mutex, PoisonError};

use dashkit_messages::ISLockMessage;
use dashkit_transactions::FullTransaction;
use dashkit_types::TxHash;
use tracing::debug;

use crate::{InstantSendError, InstantSendLockManager, InstantTransactionManager};

/// What became of a lock handed to [`InstantSendLockHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockOutcome {
    /// The transaction is now instant-final.
    Instant(TxHash),
    /// The transaction is unknown; the lock waits for it.
    Pending,
    /// The transaction was already instant.
    AlreadyInstant,
    /// Nothing to do, or the lock failed validation and was dropped.
    Dropped,
}

pub struct InstantSendLockHandler {
    transactions: Arc<InstantTransactionManager>,
    locks: InstantSendLockManager,
    // Serializes check-then-mark so two conflicting locks cannot both win.
    accept: Mutex<()>,
}

impl InstantSendLockHandler {
    pub fn new(transactions: Arc<InstantTransactionManager>, locks: InstantSendLockManager) -> Self {
        Self {
            transactions,
            locks,
            accept: Mutex::new(()),
        }
    }

    pub fn transactions(&self) -> &Arc<InstantTransactionManager> {
        &self.transactions
    }

    pub fn pending_count(&self) -> usize {
        self.locks.pending_count()
    }

    /// Handle a lock relayed by a peer. Invalid locks are dropped, not
    /// reported; only local storage failures are errors.
    pub fn handle_lock(&self, lock: ISLockMessage) -> Result<LockOutcome, InstantSendError> {
        if self.transactions.is_instant(&lock.tx_hash)? {
            return Ok(LockOutcome::AlreadyInstant);
        }
        match self.transactions.stored_transaction(&lock.tx_hash)? {
            Some(transaction) => self.accept(&lock, &transaction),
            None => {
                debug!(tx_hash = %lock.tx_hash, "islock held until transaction arrives");
                self.locks.add_pending(lock);
                Ok(LockOutcome::Pending)
            }
        }
    }

    /// Check a held lock against a transaction arriving from the network,
    /// before it is adjudicated against conflicting spends. Nothing is
    /// recorded: a verified lock is handed back so the caller can pass it to
    /// [`InstantSendLockHandler::handle_lock`] once the transaction is stored.
    pub fn verify_incoming_transaction(
        &self,
        transaction: &FullTransaction,
    ) -> Result<Option<ISLockMessage>, InstantSendError> {
        let Some(lock) = self.locks.take_pending(&transaction.hash()) else {
            return Ok(None);
        };
        Ok(self.check(&lock, transaction)?.then_some(lock))
    }

    /// Re-check a held lock once its transaction has been stored.
    pub fn handle_inserted_tx_hash(&self, hash: &TxHash) -> Result<LockOutcome, InstantSendError> {
        let Some(lock) = self.locks.take_pending(hash) else {
            return Ok(LockOutcome::Dropped);
        };
        match self.transactions.stored_transaction(hash)? {
            Some(transaction) => self.accept(&lock, &transaction),
            None => {
                self.locks.add_pending(lock);
                Ok(LockOutcome::Pending)
            }
        }
    }

    fn accept(
        &self,
        lock: &ISLockMessage,
        transaction: &FullTransaction,
    ) -> Result<LockOutcome, InstantSendError> {
        let _guard = self.accept.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.check(lock, transaction)? {
            return Ok(LockOutcome::Dropped);
        }

        if self.transactions.make_instant(&lock.tx_hash)? {
            Ok(LockOutcome::Instant(lock.tx_hash))
        } else {
            Ok(LockOutcome::AlreadyInstant)
        }
    }

    /// False when the lock fails validation; untrusted input is dropped
    /// here with a debug log.
    fn check(
        &self,
        lock: &ISLockMessage,
        transaction: &FullTransaction,
    ) -> Result<bool, InstantSendError> {
        let checked = self
            .locks
            .validate(lock)
            .and_then(|()| self.transactions.check_lockable(lock, transaction));
        match checked {
            Ok(()) => Ok(true),
            Err(e) if e.is_untrusted_input() => {
                debug!(tx_hash = %lock.tx_hash, error = %e, "islock dropped");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
