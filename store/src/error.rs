use dashkit_types::TxHash;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("transaction {0} is not in the active set")]
    TransactionNotFound(TxHash),

    #[error("transaction {0} is already stored")]
    DuplicateTransaction(TxHash),

    #[error("record encoding failed: {0}")]
    Serialization(String),

    /// The backend refused or failed a read or write.
    #[error("storage backend error: {0}")]
    Backend(String),
}
