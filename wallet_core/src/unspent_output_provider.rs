use std::sync::Arc;

use dashkit_store::{DashStore, UnspentOutput};
use dashkit_transactions::ScriptType;

use crate::WalletError;

/// Optional narrowing of the spendable set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UtxoFilters {
    pub script_types: Option<Vec<ScriptType>>,
    /// Skip outputs of transactions with more outputs than this.
    pub max_outputs_count_for_inputs: Option<usize>,
}

/// Wallet outputs buried under at least `confirmations_threshold` blocks.
pub struct ConfirmedUnspentOutputProvider {
    store: Arc<dyn DashStore>,
    confirmations_threshold: u32,
}

impl ConfirmedUnspentOutputProvider {
    pub fn new(store: Arc<dyn DashStore>, confirmations_threshold: u32) -> Self {
        Self {
            store,
            confirmations_threshold,
        }
    }

    pub fn spendable_utxo(&self, filters: &UtxoFilters) -> Result<Vec<UnspentOutput>, WalletError> {
        let last_height = self.store.last_block()?.map_or(0, |b| b.height);

        let mut spendable = Vec::new();
        for utxo in self.store.unspent_outputs()? {
            if !self.is_confirmed(&utxo, last_height) {
                continue;
            }
            if let Some(types) = &filters.script_types {
                if !types.contains(&utxo.output.script_type) {
                    continue;
                }
            }
            if let Some(max) = filters.max_outputs_count_for_inputs {
                let count = self
                    .store
                    .full_transaction(&utxo.transaction.data_hash)?
                    .map_or(0, |tx| tx.outputs.len());
                if count > max {
                    continue;
                }
            }
            spendable.push(utxo);
        }
        Ok(spendable)
    }

    fn is_confirmed(&self, utxo: &UnspentOutput, last_height: u32) -> bool {
        let Some(height) = utxo.block_height else {
            return false;
        };
        // height <= last - threshold + 1, without underflow
        u64::from(height) + u64::from(self.confirmations_threshold) <= u64::from(last_height) + 1
    }
}
