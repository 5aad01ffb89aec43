//! Transaction snapshots with InstantSend state.

use std::sync::Arc;

use dashkit_instantsend::InstantTransactionManager;
use dashkit_transactions::FullTransaction;
use dashkit_wallet_core::{TransactionInfo, TransactionInfoConverter};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashTransactionInfo {
    #[serde(flatten)]
    pub info: TransactionInfo,
    pub instant_tx: bool,
}

pub struct DashTransactionInfoConverter {
    instant: Arc<InstantTransactionManager>,
}

impl DashTransactionInfoConverter {
    pub fn new(instant: Arc<InstantTransactionManager>) -> Self {
        Self { instant }
    }

    pub fn transaction_info(&self, transaction: &FullTransaction) -> DashTransactionInfo {
        let instant_tx = self
            .instant
            .is_instant(&transaction.hash())
            .unwrap_or_else(|e| {
                tracing::warn!(hash = %transaction.hash(), error = %e, "instant state unavailable");
                false
            });
        DashTransactionInfo {
            info: TransactionInfo::from(transaction),
            instant_tx,
        }
    }
}

impl TransactionInfoConverter for DashTransactionInfoConverter {
    fn transaction_info_json(&self, transaction: &FullTransaction) -> String {
        serde_json::to_string(&self.transaction_info(transaction)).unwrap_or_else(|e| {
            tracing::warn!(hash = %transaction.hash(), error = %e, "transaction info not serializable");
            String::new()
        })
    }
}
