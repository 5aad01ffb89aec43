//! Abstract storage traits for DashKit.
//!
//! Every storage backend (the in-memory `NullStore` for tests, an embedded
//! database in applications) implements these traits. The rest of the
//! codebase depends only on the traits.
//!
//! Operations documented as atomic must be observed by concurrent readers
//! either completely or not at all.

pub mod block;
pub mod error;
pub mod instant;
pub mod masternode_list;
pub mod transaction;

pub use block::BlockStore;
pub use error::StoreError;
pub use instant::InstantLockStore;
pub use masternode_list::MasternodeListStore;
pub use transaction::{TransactionStore, UnspentOutput};

/// Every record set the Dash extension layer reads or writes.
pub trait DashStore:
    BlockStore + MasternodeListStore + TransactionStore + InstantLockStore + Send + Sync
{
}

impl<T> DashStore for T where
    T: BlockStore + MasternodeListStore + TransactionStore + InstantLockStore + Send + Sync
{
}
