//! Wallet transaction storage trait.

use serde::{Deserialize, Serialize};

use crate::StoreError;
use dashkit_transactions::{FullTransaction, Input, InvalidTransaction, Outpoint, Output, Transaction};
use dashkit_types::{BlockHash, TxHash};

/// A wallet output not spent by any active transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub output: Output,
    pub transaction: Transaction,
    /// Height of the confirming block, `None` while unconfirmed.
    pub block_height: Option<u32>,
}

/// Active and invalidated wallet transactions.
pub trait TransactionStore {
    fn transaction(&self, hash: &TxHash) -> Result<Option<Transaction>, StoreError>;

    fn full_transaction(&self, hash: &TxHash) -> Result<Option<FullTransaction>, StoreError>;

    /// Insert a new transaction with its inputs and outputs.
    /// Fails with [`StoreError::DuplicateTransaction`] if the hash is already active.
    fn add_transaction(&self, transaction: &FullTransaction) -> Result<(), StoreError>;

    /// Replace the header row of an active transaction.
    /// Fails with [`StoreError::TransactionNotFound`] if it is not active.
    fn update_transaction(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// The stored output referenced by `outpoint`, if the wallet has it.
    fn previous_output(&self, outpoint: &Outpoint) -> Result<Option<Output>, StoreError>;

    /// Active inputs spending any output of `hash`.
    fn inputs_using_outputs(&self, hash: &TxHash) -> Result<Vec<Input>, StoreError>;

    /// Active transactions, other than `transaction` itself, spending at least
    /// one outpoint that `transaction` also spends.
    fn conflicting_transactions(
        &self,
        transaction: &FullTransaction,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Outputs paying to a wallet key (`public_key_path` set).
    fn outputs_with_public_keys(&self) -> Result<Vec<Output>, StoreError>;

    /// Wallet outputs of active transactions that no active input spends.
    fn unspent_outputs(&self) -> Result<Vec<UnspentOutput>, StoreError>;

    /// Active transactions confirmed in `block_hash`.
    fn transactions_in_block(&self, block_hash: &BlockHash) -> Result<Vec<Transaction>, StoreError>;

    /// Atomically remove each transaction (with its inputs and outputs) from
    /// the active set and insert it into the invalid set.
    fn move_to_invalid(&self, invalid: Vec<InvalidTransaction>) -> Result<(), StoreError>;

    fn invalid_transaction(&self, hash: &TxHash) -> Result<Option<InvalidTransaction>, StoreError>;

    fn invalid_transactions(&self) -> Result<Vec<InvalidTransaction>, StoreError>;
}
