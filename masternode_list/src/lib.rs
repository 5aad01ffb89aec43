//! Masternode and quorum list maintenance.
//!
//! A `mnlistdiff` moves the local registries from one checkpoint block to
//! another. [`MasternodeListManager`] stages the diff on scratch copies of the
//! [`SortedList`] registries, recomputes the merkle roots committed in the
//! block's coinbase, proves the coinbase is in the block, and only then swaps
//! the registries and the checkpoint in one store write.
//! [`MasternodeListSyncer`] keeps at most one diff request in flight.

pub mod error;
pub mod manager;
pub mod merkle_root;
pub mod quorum_manager;
pub mod sorted_list;
pub mod syncer;

pub use error::{CommitmentKind, MasternodeListError};
pub use manager::MasternodeListManager;
pub use merkle_root::{masternode_list_merkle_root, quorum_list_merkle_root};
pub use quorum_manager::QuorumListManager;
pub use sorted_list::{Identified, MasternodeSortedList, QuorumSortedList, SortedList};
pub use syncer::{MasternodeListSyncer, SyncerEvent, SyncerHandle};
