//! Authenticated application of masternode list diffs.

use std::sync::Arc;

use dashkit_crypto::PartialMerkleTree;
use dashkit_messages::MasternodeListDiffMessage;
use dashkit_store::DashStore;
use dashkit_types::{BlockHash, Masternode, MasternodeListState};

use crate::{
    masternode_list_merkle_root, CommitmentKind, MasternodeListError, MasternodeSortedList,
    QuorumListManager, QuorumSortedList,
};

pub struct MasternodeListManager {
    store: Arc<dyn DashStore>,
    quorum_list_manager: Arc<QuorumListManager>,
    max_block_size: u32,
}

impl MasternodeListManager {
    pub fn new(
        store: Arc<dyn DashStore>,
        quorum_list_manager: Arc<QuorumListManager>,
        max_block_size: u32,
    ) -> Self {
        Self {
            store,
            quorum_list_manager,
            max_block_size,
        }
    }

    /// The checkpoint the next diff must start from; zero before the first sync.
    pub fn base_block_hash(&self) -> Result<BlockHash, MasternodeListError> {
        Ok(self
            .store
            .masternode_list_state()?
            .unwrap_or_default()
            .base_block_hash)
    }

    pub fn masternodes(&self) -> Result<Vec<Masternode>, MasternodeListError> {
        Ok(self.store.masternodes()?)
    }

    /// Apply `diff` and advance the checkpoint to `diff.block_hash`.
    ///
    /// Every check runs against scratch copies of the registries; the store
    /// is written once, after all of them pass.
    pub fn update_list(&self, diff: &MasternodeListDiffMessage) -> Result<(), MasternodeListError> {
        let base = self.base_block_hash()?;
        if diff.base_block_hash != base {
            return Err(MasternodeListError::StaleDiff {
                expected: base,
                actual: diff.base_block_hash,
            });
        }

        let (mut masternodes, quorums) = if base.is_zero() {
            (MasternodeSortedList::new(), QuorumSortedList::new())
        } else {
            (
                self.store.masternodes()?.into_iter().collect(),
                self.store.quorums()?.into_iter().collect(),
            )
        };

        masternodes.remove_by_ids(&diff.deleted_mns);
        masternodes.add(diff.mn_list.iter().cloned());
        let masternodes = masternodes.items();

        if masternode_list_merkle_root(&masternodes) != diff.cb_tx.merkle_root_mn_list {
            return Err(MasternodeListError::CommitmentMismatch {
                kind: CommitmentKind::MasternodeList,
            });
        }

        let quorums = self.quorum_list_manager.updated_list(quorums, diff)?;
        self.verify_coinbase_inclusion(diff)?;

        let count = masternodes.len();
        self.store.commit_masternode_list(
            masternodes,
            quorums.items(),
            MasternodeListState::new(diff.block_hash),
        )?;
        tracing::info!(
            block_hash = %diff.block_hash,
            masternodes = count,
            quorums = quorums.len(),
            "masternode list updated"
        );
        Ok(())
    }

    /// Prove the coinbase is a transaction of the stored `diff.block_hash`.
    fn verify_coinbase_inclusion(
        &self,
        diff: &MasternodeListDiffMessage,
    ) -> Result<(), MasternodeListError> {
        let block = self
            .store
            .block(&diff.block_hash)?
            .ok_or(MasternodeListError::NoMerkleBlockHeader(diff.block_hash))?;

        let tree = PartialMerkleTree::new(
            diff.total_transactions,
            diff.merkle_hashes.clone(),
            diff.merkle_flags.clone(),
        );
        let branch = tree.verify(&block.header.merkle_root, self.max_block_size)?;

        let coinbase_hash = diff.cb_tx.hash();
        if !branch
            .matched_hashes
            .iter()
            .any(|h| h == coinbase_hash.as_bytes())
        {
            return Err(MasternodeListError::CoinbaseNotInBlock);
        }
        Ok(())
    }
}
