//! Masternode and quorum registry storage trait.

use crate::StoreError;
use dashkit_types::{Masternode, MasternodeListState, Quorum};

pub trait MasternodeListStore {
    /// The single checkpoint row, absent before the first sync.
    fn masternode_list_state(&self) -> Result<Option<MasternodeListState>, StoreError>;

    /// All masternodes, in ascending `pro_reg_tx_hash` order.
    fn masternodes(&self) -> Result<Vec<Masternode>, StoreError>;

    /// All quorums, in ascending `(type, quorum_hash)` order.
    fn quorums(&self) -> Result<Vec<Quorum>, StoreError>;

    fn quorums_by_type(&self, quorum_type: u8) -> Result<Vec<Quorum>, StoreError> {
        Ok(self
            .quorums()?
            .into_iter()
            .filter(|q| q.quorum_type == quorum_type)
            .collect())
    }

    /// Atomically replace both registries and upsert the checkpoint.
    fn commit_masternode_list(
        &self,
        masternodes: Vec<Masternode>,
        quorums: Vec<Quorum>,
        state: MasternodeListState,
    ) -> Result<(), StoreError>;
}
