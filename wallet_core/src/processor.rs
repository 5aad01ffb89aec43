//! Wallet transaction processor.
//!
//! Every mutation runs under one lock so double-spend adjudication never
//! interleaves. Listener notifications fire after the lock is released.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashkit_store::DashStore;
use dashkit_transactions::{
    in_topological_order, FullTransaction, InvalidTransaction, Transaction, TransactionStatus,
};
use dashkit_types::{Block, Clock, Timestamp, TxHash};
use tracing::{debug, info};

use crate::{
    has_irregular_output, ConflictResolution, EventBus, OutputExtractor, OutputsCache,
    PublicKeyManager, TransactionEvent, TransactionInfoConverter, TransactionMediator,
    WalletError,
};

pub struct TransactionProcessor {
    store: Arc<dyn DashStore>,
    extractor: OutputExtractor,
    keys: Arc<dyn PublicKeyManager>,
    mediator: TransactionMediator,
    converter: Arc<dyn TransactionInfoConverter>,
    clock: Arc<dyn Clock>,
    events: Arc<EventBus>,
    outputs: Mutex<OutputsCache>,
}

/// Net changes of one pass, emitted once the lock is released.
#[derive(Default)]
struct Delta {
    inserted: Vec<Transaction>,
    updated: Vec<Transaction>,
    invalidated: Vec<InvalidTransaction>,
}

impl TransactionProcessor {
    /// Loads the outputs cache from the wallet's stored outputs.
    pub fn new(
        store: Arc<dyn DashStore>,
        keys: Arc<dyn PublicKeyManager>,
        converter: Arc<dyn TransactionInfoConverter>,
        clock: Arc<dyn Clock>,
        events: Arc<EventBus>,
    ) -> Result<Self, WalletError> {
        let mut outputs = OutputsCache::new();
        outputs.add(&store.outputs_with_public_keys()?);
        Ok(Self {
            extractor: OutputExtractor::new(Arc::clone(&keys)),
            mediator: TransactionMediator::new(Arc::clone(&store)),
            store,
            keys,
            converter,
            clock,
            events,
            outputs: Mutex::new(outputs),
        })
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Process transactions seen in the mempool (`block` is `None`) or
    /// matched in `block`.
    ///
    /// Returns [`WalletError::BloomFilterExpired`] after all changes are
    /// stored and notified when the wallet's filter must be rebuilt.
    pub fn process_received(
        &self,
        transactions: Vec<FullTransaction>,
        block: Option<&Block>,
        skip_check_bloom_filter: bool,
    ) -> Result<(), WalletError> {
        self.process_received_locked(transactions, block, skip_check_bloom_filter, &HashSet::new())
    }

    /// As [`TransactionProcessor::process_received`], with `locked` naming
    /// transactions whose lock has been verified but not recorded. They win
    /// double-spend adjudication as if instant; recording the lock is left to
    /// the caller once the transaction is stored.
    pub fn process_received_locked(
        &self,
        transactions: Vec<FullTransaction>,
        block: Option<&Block>,
        skip_check_bloom_filter: bool,
        locked: &HashSet<TxHash>,
    ) -> Result<(), WalletError> {
        let mut delta = Delta::default();
        let mut filter_expired = false;

        let result = {
            let mut outputs = self.lock();
            self.receive(
                &mut outputs,
                transactions,
                block,
                skip_check_bloom_filter,
                locked,
                &mut delta,
                &mut filter_expired,
            )
        };
        self.notify(delta, block);
        result?;

        if filter_expired {
            return Err(WalletError::BloomFilterExpired);
        }
        Ok(())
    }

    /// Store a transaction the wallet built itself.
    pub fn process_created(&self, mut transaction: FullTransaction) -> Result<(), WalletError> {
        let hash = transaction.hash();
        {
            let mut outputs = self.lock();
            if self.store.transaction(&hash)?.is_some() {
                return Err(WalletError::TransactionAlreadyExists(hash));
            }
            self.classify(&outputs, &mut transaction);
            self.store.add_transaction(&transaction)?;
            outputs.add(&transaction.outputs);
        }
        info!(%hash, "created transaction stored");

        let irregular = has_irregular_output(&transaction.outputs);
        self.notify(
            Delta {
                inserted: vec![transaction.header],
                ..Delta::default()
            },
            None,
        );
        if irregular {
            return Err(WalletError::BloomFilterExpired);
        }
        Ok(())
    }

    /// Invalidate `hash` and every stored transaction descending from it.
    pub fn process_invalid(&self, hash: &TxHash) -> Result<Vec<InvalidTransaction>, WalletError> {
        let invalidated = {
            let _guard = self.lock();
            self.invalidate(hash)?
        };
        self.notify(
            Delta {
                invalidated: invalidated.clone(),
                ..Delta::default()
            },
            None,
        );
        Ok(invalidated)
    }

    fn receive(
        &self,
        outputs: &mut OutputsCache,
        transactions: Vec<FullTransaction>,
        block: Option<&Block>,
        skip_check_bloom_filter: bool,
        locked: &HashSet<TxHash>,
        delta: &mut Delta,
        filter_expired: &mut bool,
    ) -> Result<(), WalletError> {
        for (order, mut transaction) in in_topological_order(transactions).into_iter().enumerate() {
            let order = u32::try_from(order).unwrap_or(u32::MAX);

            if let Some(mut existing) = self.store.transaction(&transaction.hash())? {
                if existing.is_confirmed() && block.is_none() {
                    continue;
                }
                self.relay(&mut existing, order, block)?;
                if block.is_some() {
                    existing.conflicting_tx_hash = None;
                }
                self.store.update_transaction(&existing)?;
                delta.updated.push(existing);
                continue;
            }

            self.classify(outputs, &mut transaction);
            if !transaction.header.is_mine {
                continue;
            }
            self.relay(&mut transaction.header, order, block)?;

            let mut conflicts = self.store.conflicting_transactions(&transaction)?;
            let received_locked = locked.contains(&transaction.hash());
            match self.mediator.resolve(&transaction, received_locked, &mut conflicts)? {
                ConflictResolution::Ignore => {
                    debug!(hash = %transaction.hash(), conflicts = conflicts.len(), "received transaction ignored");
                    for conflict in &conflicts {
                        self.store.update_transaction(conflict)?;
                    }
                    delta.updated.extend(conflicts);
                }
                ConflictResolution::Accept => {
                    for conflict in &conflicts {
                        delta.invalidated.extend(self.invalidate(&conflict.data_hash)?);
                    }
                    self.store.add_transaction(&transaction)?;
                    outputs.add(&transaction.outputs);
                    delta.inserted.push(transaction.header.clone());
                }
            }

            if !skip_check_bloom_filter {
                *filter_expired = *filter_expired
                    || self.keys.gap_shifts()
                    || has_irregular_output(&transaction.outputs);
            }
        }
        Ok(())
    }

    /// Ownership: outputs paying to wallet keys, or inputs spending a
    /// wallet output (outgoing).
    fn classify(&self, outputs: &OutputsCache, transaction: &mut FullTransaction) {
        self.extractor.extract(transaction);
        if outputs.has_outputs_for(&transaction.inputs) {
            transaction.header.mark_mine(true);
        }
    }

    fn relay(
        &self,
        transaction: &mut Transaction,
        order: u32,
        block: Option<&Block>,
    ) -> Result<(), WalletError> {
        transaction.block_hash = block.map(Block::hash);
        transaction.status = TransactionStatus::Relayed;
        transaction.timestamp = block
            .map(|b| Timestamp::from(b.timestamp()))
            .unwrap_or_else(|| self.clock.now());
        transaction.order = order;

        if let Some(block) = block {
            if !block.has_transactions {
                let mut block = block.clone();
                block.has_transactions = true;
                self.store.put_block(&block)?;
            }
        }
        Ok(())
    }

    /// Moves `hash` and its descendants to the invalid set in one store
    /// call. Unknown hashes invalidate nothing.
    fn invalidate(&self, hash: &TxHash) -> Result<Vec<InvalidTransaction>, WalletError> {
        let mut queue = VecDeque::from([*hash]);
        let mut visited = HashSet::new();
        let mut invalid = Vec::new();

        while let Some(hash) = queue.pop_front() {
            if !visited.insert(hash) {
                continue;
            }
            let Some(mut transaction) = self.store.full_transaction(&hash)? else {
                continue;
            };
            queue.extend(
                self.store
                    .inputs_using_outputs(&hash)?
                    .into_iter()
                    .map(|input| input.transaction_hash),
            );
            transaction.header.status = TransactionStatus::Invalid;
            let json = self.converter.transaction_info_json(&transaction);
            invalid.push(InvalidTransaction::new(transaction, json));
        }

        if invalid.is_empty() {
            return Ok(invalid);
        }
        self.store.move_to_invalid(invalid.clone())?;
        info!(%hash, count = invalid.len(), "transactions invalidated");
        Ok(invalid)
    }

    fn notify(&self, delta: Delta, block: Option<&Block>) {
        if !delta.invalidated.is_empty() {
            self.events
                .emit(&TransactionEvent::Invalidated(delta.invalidated));
        }
        if !delta.inserted.is_empty() || !delta.updated.is_empty() {
            self.events.emit(&TransactionEvent::Updated {
                inserted: delta.inserted,
                updated: delta.updated,
                block_hash: block.map(Block::hash),
            });
        }
    }

    fn lock(&self) -> MutexGuard<'_, OutputsCache> {
        self.outputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
