//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Records are kept bincode-encoded, the way an embedded key-value backend
//! would hold them, so encoding failures surface as [`StoreError`]s. Every
//! table sits behind one mutex, which makes the multi-table operations
//! (`commit_masternode_list`, `move_to_invalid`) atomic to readers.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use dashkit_store::{
    BlockStore, InstantLockStore, MasternodeListStore, StoreError, TransactionStore,
    UnspentOutput,
};
use dashkit_transactions::{FullTransaction, Input, InvalidTransaction, Outpoint, Output, Transaction};
use dashkit_types::{Block, BlockHash, Masternode, MasternodeListState, Quorum, QuorumId, TxHash};

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[derive(Default)]
struct Tables {
    blocks: HashMap<BlockHash, Vec<u8>>,
    masternodes: BTreeMap<TxHash, Vec<u8>>,
    quorums: BTreeMap<QuorumId, Vec<u8>>,
    masternode_list_state: Option<Vec<u8>>,
    transactions: BTreeMap<TxHash, Vec<u8>>,
    /// Outpoint -> active transactions spending it.
    spends: BTreeMap<Outpoint, BTreeSet<TxHash>>,
    invalid_transactions: BTreeMap<TxHash, Vec<u8>>,
    instant: HashSet<TxHash>,
}

impl Tables {
    fn full_transaction(&self, hash: &TxHash) -> Result<Option<FullTransaction>, StoreError> {
        self.transactions.get(hash).map(|b| decode(b)).transpose()
    }

    fn active_transactions(&self) -> Result<Vec<FullTransaction>, StoreError> {
        self.transactions.values().map(|b| decode(b)).collect()
    }

    fn unlink_spends(&mut self, tx: &FullTransaction) {
        for input in &tx.inputs {
            if let Some(spenders) = self.spends.get_mut(&input.previous_output) {
                spenders.remove(&tx.hash());
                if spenders.is_empty() {
                    self.spends.remove(&input.previous_output);
                }
            }
        }
    }

    fn is_spent(&self, outpoint: &Outpoint) -> bool {
        self.spends.get(outpoint).is_some_and(|s| !s.is_empty())
    }
}

/// A write a [`NullStore`] can be told to refuse with [`StoreError::Backend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreFault {
    CommitMasternodeList,
    AddTransaction,
    UpdateTransaction,
    MoveToInvalid,
    AddInstant,
}

/// An in-memory implementation of every DashKit store trait.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    faults: Mutex<HashSet<StoreFault>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `commit_masternode_list` always fails.
    pub fn failing_commit() -> Self {
        let store = Self::new();
        store.fail(StoreFault::CommitMasternodeList);
        store
    }

    /// Make every later `fault` write fail until [`NullStore::recover`].
    pub fn fail(&self, fault: StoreFault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fault);
    }

    pub fn recover(&self, fault: StoreFault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&fault);
    }

    fn check(&self, fault: StoreFault) -> Result<(), StoreError> {
        let failing = self
            .faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&fault);
        if failing {
            return Err(StoreError::Backend(format!("{fault:?}: disk full")));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".into()))
    }

    /// Seed a chain of blocks (test convenience).
    pub fn put_blocks(&self, blocks: &[Block]) -> Result<(), StoreError> {
        blocks.iter().try_for_each(|b| self.put_block(b))
    }

    pub fn transaction_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.transactions.len())
    }
}

impl BlockStore for NullStore {
    fn block(&self, hash: &BlockHash) -> Result<Option<Block>, StoreError> {
        self.lock()?.blocks.get(hash).map(|b| decode(b)).transpose()
    }

    fn last_block(&self) -> Result<Option<Block>, StoreError> {
        let tables = self.lock()?;
        let mut best: Option<Block> = None;
        for bytes in tables.blocks.values() {
            let block: Block = decode(bytes)?;
            if best.as_ref().map_or(true, |b| block.height > b.height) {
                best = Some(block);
            }
        }
        Ok(best)
    }

    fn put_block(&self, block: &Block) -> Result<(), StoreError> {
        let bytes = encode(block)?;
        self.lock()?.blocks.insert(block.hash(), bytes);
        Ok(())
    }
}

impl MasternodeListStore for NullStore {
    fn masternode_list_state(&self) -> Result<Option<MasternodeListState>, StoreError> {
        self.lock()?
            .masternode_list_state
            .as_deref()
            .map(decode)
            .transpose()
    }

    fn masternodes(&self) -> Result<Vec<Masternode>, StoreError> {
        self.lock()?.masternodes.values().map(|b| decode(b)).collect()
    }

    fn quorums(&self) -> Result<Vec<Quorum>, StoreError> {
        self.lock()?.quorums.values().map(|b| decode(b)).collect()
    }

    fn commit_masternode_list(
        &self,
        masternodes: Vec<Masternode>,
        quorums: Vec<Quorum>,
        state: MasternodeListState,
    ) -> Result<(), StoreError> {
        self.check(StoreFault::CommitMasternodeList)?;
        // Encode everything before taking the lock so a failure leaves the
        // tables untouched.
        let masternodes = masternodes
            .iter()
            .map(|m| Ok((m.identity(), encode(m)?)))
            .collect::<Result<BTreeMap<_, _>, StoreError>>()?;
        let quorums = quorums
            .iter()
            .map(|q| Ok((q.identity(), encode(q)?)))
            .collect::<Result<BTreeMap<_, _>, StoreError>>()?;
        let state = encode(&state)?;

        let mut tables = self.lock()?;
        tables.masternodes = masternodes;
        tables.quorums = quorums;
        tables.masternode_list_state = Some(state);
        Ok(())
    }
}

impl TransactionStore for NullStore {
    fn transaction(&self, hash: &TxHash) -> Result<Option<Transaction>, StoreError> {
        Ok(self.full_transaction(hash)?.map(|tx| tx.header))
    }

    fn full_transaction(&self, hash: &TxHash) -> Result<Option<FullTransaction>, StoreError> {
        self.lock()?.full_transaction(hash)
    }

    fn add_transaction(&self, transaction: &FullTransaction) -> Result<(), StoreError> {
        self.check(StoreFault::AddTransaction)?;
        let hash = transaction.hash();
        let bytes = encode(transaction)?;
        let mut tables = self.lock()?;
        if tables.transactions.contains_key(&hash) {
            return Err(StoreError::DuplicateTransaction(hash));
        }
        tables.transactions.insert(hash, bytes);
        for input in &transaction.inputs {
            tables
                .spends
                .entry(input.previous_output)
                .or_default()
                .insert(hash);
        }
        Ok(())
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.check(StoreFault::UpdateTransaction)?;
        let hash = transaction.data_hash;
        let mut tables = self.lock()?;
        let mut full = tables
            .full_transaction(&hash)?
            .ok_or_else(|| StoreError::TransactionNotFound(hash))?;
        full.header = transaction.clone();
        let bytes = encode(&full)?;
        tables.transactions.insert(hash, bytes);
        Ok(())
    }

    fn previous_output(&self, outpoint: &Outpoint) -> Result<Option<Output>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.full_transaction(&outpoint.hash)?.and_then(|tx| {
            tx.outputs
                .into_iter()
                .find(|o| o.index == outpoint.index)
        }))
    }

    fn inputs_using_outputs(&self, hash: &TxHash) -> Result<Vec<Input>, StoreError> {
        let tables = self.lock()?;
        let range = Outpoint::new(*hash, 0)..=Outpoint::new(*hash, u32::MAX);
        let mut inputs = Vec::new();
        for (outpoint, spenders) in tables.spends.range(range) {
            for spender in spenders {
                if let Some(tx) = tables.full_transaction(spender)? {
                    inputs.extend(
                        tx.inputs
                            .into_iter()
                            .filter(|i| &i.previous_output == outpoint),
                    );
                }
            }
        }
        Ok(inputs)
    }

    fn conflicting_transactions(
        &self,
        transaction: &FullTransaction,
    ) -> Result<Vec<Transaction>, StoreError> {
        let tables = self.lock()?;
        let own = transaction.hash();
        let mut hashes = BTreeSet::new();
        for input in &transaction.inputs {
            if let Some(spenders) = tables.spends.get(&input.previous_output) {
                hashes.extend(spenders.iter().filter(|h| **h != own).copied());
            }
        }
        let mut conflicts = Vec::with_capacity(hashes.len());
        for hash in hashes {
            if let Some(tx) = tables.full_transaction(&hash)? {
                conflicts.push(tx.header);
            }
        }
        Ok(conflicts)
    }

    fn outputs_with_public_keys(&self) -> Result<Vec<Output>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .active_transactions()?
            .into_iter()
            .flat_map(|tx| tx.outputs)
            .filter(Output::is_mine)
            .collect())
    }

    fn unspent_outputs(&self) -> Result<Vec<UnspentOutput>, StoreError> {
        let tables = self.lock()?;
        let mut unspent = Vec::new();
        for tx in tables.active_transactions()? {
            let block_height = match &tx.header.block_hash {
                Some(hash) => tables
                    .blocks
                    .get(hash)
                    .map(|b| decode::<Block>(b))
                    .transpose()?
                    .map(|b| b.height),
                None => None,
            };
            for output in &tx.outputs {
                let outpoint = Outpoint::new(tx.hash(), output.index);
                if output.is_mine() && !tables.is_spent(&outpoint) {
                    unspent.push(UnspentOutput {
                        output: output.clone(),
                        transaction: tx.header.clone(),
                        block_height,
                    });
                }
            }
        }
        Ok(unspent)
    }

    fn transactions_in_block(&self, block_hash: &BlockHash) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .lock()?
            .active_transactions()?
            .into_iter()
            .map(|tx| tx.header)
            .filter(|h| h.block_hash.as_ref() == Some(block_hash))
            .collect())
    }

    fn move_to_invalid(&self, invalid: Vec<InvalidTransaction>) -> Result<(), StoreError> {
        self.check(StoreFault::MoveToInvalid)?;
        let mut tables = self.lock()?;

        // Validate and encode first; mutate only once nothing can fail.
        let mut staged = Vec::with_capacity(invalid.len());
        for record in &invalid {
            let hash = record.hash();
            let active = tables
                .full_transaction(&hash)?
                .ok_or_else(|| StoreError::TransactionNotFound(hash))?;
            staged.push((hash, active, encode(record)?));
        }

        for (hash, active, bytes) in staged {
            tables.unlink_spends(&active);
            tables.transactions.remove(&hash);
            tables.invalid_transactions.insert(hash, bytes);
        }
        Ok(())
    }

    fn invalid_transaction(&self, hash: &TxHash) -> Result<Option<InvalidTransaction>, StoreError> {
        self.lock()?
            .invalid_transactions
            .get(hash)
            .map(|b| decode(b))
            .transpose()
    }

    fn invalid_transactions(&self) -> Result<Vec<InvalidTransaction>, StoreError> {
        self.lock()?
            .invalid_transactions
            .values()
            .map(|b| decode(b))
            .collect()
    }
}

impl InstantLockStore for NullStore {
    fn is_instant(&self, hash: &TxHash) -> Result<bool, StoreError> {
        Ok(self.lock()?.instant.contains(hash))
    }

    fn add_instant(&self, hash: &TxHash) -> Result<(), StoreError> {
        self.check(StoreFault::AddInstant)?;
        self.lock()?.instant.insert(*hash);
        Ok(())
    }
}
