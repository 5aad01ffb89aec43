//! User-facing transaction snapshots.
//!
//! An invalidated transaction loses its rows in the active tables, so the
//! processor stores a JSON snapshot alongside it for later display.

use dashkit_transactions::{FullTransaction, TransactionStatus};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInputInfo {
    pub previous_hash: String,
    pub previous_index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutputInfo {
    pub index: u32,
    pub value: u64,
    pub mine: bool,
    pub change_output: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub transaction_hash: String,
    pub transaction_index: u32,
    pub timestamp: u64,
    pub status: TransactionStatus,
    pub block_hash: Option<String>,
    pub is_outgoing: bool,
    pub conflicting_hash: Option<String>,
    pub inputs: Vec<TransactionInputInfo>,
    pub outputs: Vec<TransactionOutputInfo>,
}

impl From<&FullTransaction> for TransactionInfo {
    fn from(tx: &FullTransaction) -> Self {
        let header = &tx.header;
        Self {
            transaction_hash: header.data_hash.to_string(),
            transaction_index: header.order,
            timestamp: header.timestamp.as_secs(),
            status: header.status,
            block_hash: header.block_hash.map(|h| h.to_string()),
            is_outgoing: header.is_outgoing,
            conflicting_hash: header.conflicting_tx_hash.map(|h| h.to_string()),
            inputs: tx
                .inputs
                .iter()
                .map(|i| TransactionInputInfo {
                    previous_hash: i.previous_output.hash.to_string(),
                    previous_index: i.previous_output.index,
                })
                .collect(),
            outputs: tx
                .outputs
                .iter()
                .map(|o| TransactionOutputInfo {
                    index: o.index,
                    value: o.value,
                    mine: o.is_mine(),
                    change_output: o.change_output,
                })
                .collect(),
        }
    }
}

/// Produces the JSON snapshot stored with an invalidated transaction.
pub trait TransactionInfoConverter: Send + Sync {
    fn transaction_info_json(&self, transaction: &FullTransaction) -> String;
}

/// Plain [`TransactionInfo`] snapshots.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseTransactionInfoConverter;

impl TransactionInfoConverter for BaseTransactionInfoConverter {
    fn transaction_info_json(&self, transaction: &FullTransaction) -> String {
        serde_json::to_string(&TransactionInfo::from(transaction)).unwrap_or_else(|e| {
            tracing::warn!(hash = %transaction.hash(), error = %e, "transaction info not serializable");
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashkit_transactions::{script, Input, Outpoint, Output, Transaction};
    use dashkit_types::TxHash;

    #[test]
    fn snapshot_carries_hash_and_outputs() {
        let tx = FullTransaction::new(
            Transaction::new(2, 0, 0),
            vec![Input::new(Outpoint::new(TxHash::new([1; 32]), 3), vec![], 0)],
            vec![Output::new(5_000, 0, script::p2pkh(&[4; 20]))],
        );
        let json = BaseTransactionInfoConverter.transaction_info_json(&tx);
        let info: TransactionInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(info.transaction_hash, tx.hash().to_string());
        assert_eq!(info.inputs[0].previous_index, 3);
        assert_eq!(info.outputs[0].value, 5_000);
        assert!(!info.outputs[0].mine);
        assert_eq!(info.status, TransactionStatus::New);
    }
}
