//! Locks that arrived before their transaction.
//!
//! Locks for unknown transactions are held until the transaction is
//! inserted, then validated. The holding area is bounded; the oldest lock
//! is dropped first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use dashkit_messages::ISLockMessage;
use dashkit_types::TxHash;

use crate::{InstantSendError, InstantSendLockValidator};

const MAX_PENDING_LOCKS: usize = 4096;

#[derive(Default)]
struct Pending {
    locks: HashMap<TxHash, ISLockMessage>,
    arrival: VecDeque<TxHash>,
}

pub struct InstantSendLockManager {
    validator: InstantSendLockValidator,
    pending: Mutex<Pending>,
}

impl InstantSendLockManager {
    pub fn new(validator: InstantSendLockValidator) -> Self {
        Self {
            validator,
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Hold `lock` until its transaction arrives. A later lock for the same
    /// transaction replaces the earlier one.
    pub fn add_pending(&self, lock: ISLockMessage) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.locks.len() >= MAX_PENDING_LOCKS && !pending.locks.contains_key(&lock.tx_hash) {
            while let Some(oldest) = pending.arrival.pop_front() {
                if pending.locks.remove(&oldest).is_some() {
                    break;
                }
            }
        }
        if pending.locks.insert(lock.tx_hash, lock.clone()).is_none() {
            pending.arrival.push_back(lock.tx_hash);
        }
    }

    pub fn take_pending(&self, tx_hash: &TxHash) -> Option<ISLockMessage> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = pending.locks.remove(tx_hash)?;
        pending.arrival.retain(|h| h != tx_hash);
        Some(lock)
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .locks
            .len()
    }

    pub fn validate(&self, lock: &ISLockMessage) -> Result<(), InstantSendError> {
        self.validator.validate(lock)
    }
}
