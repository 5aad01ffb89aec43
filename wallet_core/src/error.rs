use dashkit_store::StoreError;
use dashkit_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The wallet's bloom filter no longer covers what it must match; the
    /// caller rebuilds and resends it. Storage changes already happened.
    #[error("bloom filter expired")]
    BloomFilterExpired,

    #[error("transaction {0} already exists")]
    TransactionAlreadyExists(TxHash),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
