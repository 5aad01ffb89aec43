//! Transaction change notifications.

use std::sync::{PoisonError, RwLock};

use dashkit_transactions::{InvalidTransaction, Transaction};
use dashkit_types::BlockHash;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionEvent {
    /// Net result of one processing pass.
    Updated {
        inserted: Vec<Transaction>,
        updated: Vec<Transaction>,
        block_hash: Option<BlockHash>,
    },
    /// Transactions moved out of the active set.
    Invalidated(Vec<InvalidTransaction>),
}

type Listener = Box<dyn Fn(&TransactionEvent) + Send + Sync>;

/// Synchronous fan-out bus. Listeners run on the emitting thread, after the
/// emitter has released its own locks.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Listener) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn emit(&self, event: &TransactionEvent) {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }
}
