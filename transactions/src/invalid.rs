//! Transactions moved out of the active set.

use dashkit_types::TxHash;
use serde::{Deserialize, Serialize};

use crate::{FullTransaction, TransactionStatus};

/// An invalidated transaction plus a JSON snapshot of its user-facing info,
/// captured at invalidation time so it can still be displayed after its
/// inputs and outputs have left the active tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidTransaction {
    pub transaction: FullTransaction,
    pub transaction_info_json: String,
}

impl InvalidTransaction {
    pub fn new(mut transaction: FullTransaction, transaction_info_json: String) -> Self {
        transaction.header.status = TransactionStatus::Invalid;
        Self {
            transaction,
            transaction_info_json,
        }
    }

    pub fn hash(&self) -> TxHash {
        self.transaction.hash()
    }
}
