//! Merkle roots committed in the DIP-0004 coinbase payload.

use dashkit_crypto::{double_sha256, merkle_root};
use dashkit_protocol::masternode::hashing_bytes;
use dashkit_types::{Masternode, Quorum};

/// Root over `SHA256d(entry)` for `masternodes`, which must already be in
/// ascending `pro_reg_tx_hash` order.
pub fn masternode_list_merkle_root(masternodes: &[Masternode]) -> [u8; 32] {
    let leaves: Vec<[u8; 32]> = masternodes
        .iter()
        .map(|mn| double_sha256(&hashing_bytes(mn)))
        .collect();
    merkle_root(&leaves)
}

/// Root over the commitment `data_hash` values, sorted ascending.
pub fn quorum_list_merkle_root(quorums: &[Quorum]) -> [u8; 32] {
    let mut leaves: Vec<[u8; 32]> = quorums.iter().map(|q| q.data_hash).collect();
    leaves.sort_unstable();
    merkle_root(&leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashkit_crypto::double_sha256_multi;
    use dashkit_protocol::quorum::new_commitment;
    use dashkit_types::BlockHash;

    fn quorum(n: u8) -> Quorum {
        new_commitment(1, 1, BlockHash::new([n; 32]), None, 50, vec![n; 48], vec![n; 96], vec![n; 96])
    }

    #[test]
    fn quorum_root_is_order_independent() {
        let (a, b, c) = (quorum(1), quorum(2), quorum(3));
        let forward = quorum_list_merkle_root(&[a.clone(), b.clone(), c.clone()]);
        let shuffled = quorum_list_merkle_root(&[c, a, b]);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn two_quorums_hash_their_sorted_pair() {
        let (a, b) = (quorum(1), quorum(2));
        let (low, high) = if a.data_hash < b.data_hash {
            (a.data_hash, b.data_hash)
        } else {
            (b.data_hash, a.data_hash)
        };
        assert_eq!(
            quorum_list_merkle_root(&[b, a]),
            double_sha256_multi(&[&low, &high])
        );
    }

    #[test]
    fn empty_lists_have_zero_root() {
        assert_eq!(masternode_list_merkle_root(&[]), [0u8; 32]);
        assert_eq!(quorum_list_merkle_root(&[]), [0u8; 32]);
    }
}
