//! Quorum registry updates and signing-quorum selection.

use std::sync::Arc;

use dashkit_crypto::double_sha256_multi;
use dashkit_messages::MasternodeListDiffMessage;
use dashkit_store::DashStore;
use dashkit_types::{Quorum, QuorumType};

use crate::{quorum_list_merkle_root, CommitmentKind, MasternodeListError, QuorumSortedList};

/// Coinbase payload version that commits to the quorum list.
const QUORUM_COMMITMENT_CB_VERSION: u16 = 2;

pub struct QuorumListManager {
    store: Arc<dyn DashStore>,
}

impl QuorumListManager {
    pub fn new(store: Arc<dyn DashStore>) -> Self {
        Self { store }
    }

    /// Apply the quorum half of `diff` to `current` and check the result
    /// against the coinbase commitment. Nothing is persisted.
    pub fn updated_list(
        &self,
        mut current: QuorumSortedList,
        diff: &MasternodeListDiffMessage,
    ) -> Result<QuorumSortedList, MasternodeListError> {
        current.remove_by_ids(&diff.deleted_quorums);
        current.add(diff.quorum_list.iter().cloned());

        if diff.cb_tx.cb_version >= QUORUM_COMMITMENT_CB_VERSION {
            let computed = quorum_list_merkle_root(&current.items());
            if diff.cb_tx.merkle_root_quorums != Some(computed) {
                return Err(MasternodeListError::CommitmentMismatch {
                    kind: CommitmentKind::Quorums,
                });
            }
        }
        Ok(current)
    }

    /// The quorum of `quorum_type` responsible for signing `request_id`:
    /// the one with the lowest `SHA256d(type || quorum_hash || request_id)`.
    pub fn quorum(
        &self,
        request_id: &[u8; 32],
        quorum_type: QuorumType,
    ) -> Result<Option<Quorum>, MasternodeListError> {
        let type_byte = [quorum_type.as_u8()];
        let selected = self
            .store
            .quorums_by_type(quorum_type.as_u8())?
            .into_iter()
            .map(|q| {
                let ordering =
                    double_sha256_multi(&[&type_byte, q.quorum_hash.as_bytes(), request_id]);
                (ordering, q)
            })
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, q)| q);
        Ok(selected)
    }
}
