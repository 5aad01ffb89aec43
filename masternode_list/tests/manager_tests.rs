mod common;

use std::sync::Arc;

use common::*;
use dashkit_masternode_list::{
    CommitmentKind, MasternodeListError, MasternodeListManager, QuorumListManager,
};
use dashkit_nullables::{NullStore, StoreFault};
use dashkit_store::{BlockStore, MasternodeListStore, StoreError};
use dashkit_types::{BlockHash, MasternodeListState};

const MAX_BLOCK_SIZE: u32 = 2_000_000_000;

fn manager(store: Arc<NullStore>) -> MasternodeListManager {
    let quorums = Arc::new(QuorumListManager::new(store.clone()));
    MasternodeListManager::new(store, quorums, MAX_BLOCK_SIZE)
}

/// Apply a genesis diff with masternodes 1..=3 and quorums 1..=2.
fn seeded() -> (Arc<NullStore>, MasternodeListManager) {
    let store = Arc::new(NullStore::new());
    let mns = vec![masternode(1, 9999), masternode(2, 9999), masternode(3, 9999)];
    let quorums = vec![quorum(1), quorum(2)];
    let cb = coinbase(2, &mns, &quorums);
    store.put_block(&block_with(block_hash(10), &cb)).unwrap();

    let diff = DiffBuilder::new(BlockHash::ZERO, block_hash(10), cb)
        .add_masternodes(mns)
        .add_quorums(quorums)
        .build();
    let manager = manager(store.clone());
    manager.update_list(&diff).unwrap();
    (store, manager)
}

#[test]
fn genesis_diff_populates_registries() {
    let (store, manager) = seeded();

    assert_eq!(manager.base_block_hash().unwrap(), block_hash(10));
    assert_eq!(store.masternodes().unwrap().len(), 3);
    assert_eq!(store.quorums().unwrap().len(), 2);
}

#[test]
fn incremental_diff_deletes_then_adds() {
    let (store, manager) = seeded();

    let final_mns = vec![masternode(1, 19999), masternode(3, 9999), masternode(4, 9999)];
    let final_quorums = vec![quorum(2), quorum(3)];
    let cb = coinbase(2, &final_mns, &final_quorums);
    store.put_block(&block_with(block_hash(11), &cb)).unwrap();

    let diff = DiffBuilder::new(block_hash(10), block_hash(11), cb)
        .delete_masternodes(vec![masternode(2, 0).pro_reg_tx_hash])
        .add_masternodes(vec![masternode(1, 19999), masternode(4, 9999)])
        .delete_quorums(vec![quorum(1).identity()])
        .add_quorums(vec![quorum(3)])
        .build();
    manager.update_list(&diff).unwrap();

    let stored = store.masternodes().unwrap();
    let ports: Vec<(u8, u16)> = stored
        .iter()
        .map(|m| (m.pro_reg_tx_hash.as_bytes()[0], m.port))
        .collect();
    assert_eq!(ports, vec![(1, 19999), (3, 9999), (4, 9999)]);
    let quorum_ids: Vec<_> = store.quorums().unwrap().iter().map(|q| q.identity()).collect();
    assert_eq!(quorum_ids, vec![quorum(2).identity(), quorum(3).identity()]);
    assert_eq!(manager.base_block_hash().unwrap(), block_hash(11));
}

#[test]
fn wrong_base_is_stale() {
    let (_, manager) = seeded();
    let cb = coinbase(1, &[], &[]);
    let diff = DiffBuilder::new(block_hash(99), block_hash(11), cb).build();

    assert_eq!(
        manager.update_list(&diff),
        Err(MasternodeListError::StaleDiff {
            expected: block_hash(10),
            actual: block_hash(99),
        })
    );
}

#[test]
fn reapplying_committed_diff_is_stale() {
    let store = Arc::new(NullStore::new());
    let mns = vec![masternode(1, 9999)];
    let cb = coinbase(1, &mns, &[]);
    store.put_block(&block_with(block_hash(10), &cb)).unwrap();
    let diff = DiffBuilder::new(BlockHash::ZERO, block_hash(10), cb)
        .add_masternodes(mns)
        .build();
    let manager = manager(store);

    manager.update_list(&diff).unwrap();
    assert!(matches!(
        manager.update_list(&diff),
        Err(MasternodeListError::StaleDiff { .. })
    ));
}

#[test]
fn commitment_mismatch_leaves_state_untouched() {
    let (store, manager) = seeded();
    let before_mns = store.masternodes().unwrap();
    let before_quorums = store.quorums().unwrap();

    // Coinbase commits to a list without masternode 4.
    let cb = coinbase(2, &[masternode(1, 9999), masternode(2, 9999), masternode(3, 9999)], &[quorum(1), quorum(2)]);
    store.put_block(&block_with(block_hash(11), &cb)).unwrap();
    let diff = DiffBuilder::new(block_hash(10), block_hash(11), cb)
        .add_masternodes(vec![masternode(4, 9999)])
        .build();

    assert_eq!(
        manager.update_list(&diff),
        Err(MasternodeListError::CommitmentMismatch {
            kind: CommitmentKind::MasternodeList
        })
    );
    assert_eq!(store.masternodes().unwrap(), before_mns);
    assert_eq!(store.quorums().unwrap(), before_quorums);
    assert_eq!(manager.base_block_hash().unwrap(), block_hash(10));
}

#[test]
fn quorum_commitment_mismatch_is_rejected() {
    let (store, manager) = seeded();
    let mns = vec![masternode(1, 9999), masternode(2, 9999), masternode(3, 9999)];
    let cb = coinbase(2, &mns, &[quorum(1), quorum(2)]);
    store.put_block(&block_with(block_hash(11), &cb)).unwrap();
    let diff = DiffBuilder::new(block_hash(10), block_hash(11), cb)
        .add_quorums(vec![quorum(5)])
        .build();

    assert_eq!(
        manager.update_list(&diff),
        Err(MasternodeListError::CommitmentMismatch {
            kind: CommitmentKind::Quorums
        })
    );
    assert_eq!(store.quorums().unwrap().len(), 2);
}

#[test]
fn version_one_coinbase_skips_quorum_root() {
    let store = Arc::new(NullStore::new());
    let mns = vec![masternode(1, 9999)];
    let cb = coinbase(1, &mns, &[]);
    store.put_block(&block_with(block_hash(10), &cb)).unwrap();
    let diff = DiffBuilder::new(BlockHash::ZERO, block_hash(10), cb)
        .add_masternodes(mns)
        .add_quorums(vec![quorum(7)])
        .build();

    manager(store.clone()).update_list(&diff).unwrap();
    assert_eq!(store.quorums().unwrap(), vec![quorum(7)]);
}

#[test]
fn missing_block_header_is_reported() {
    let store = Arc::new(NullStore::new());
    let cb = coinbase(1, &[], &[]);
    let diff = DiffBuilder::new(BlockHash::ZERO, block_hash(10), cb).build();

    assert_eq!(
        manager(store.clone()).update_list(&diff),
        Err(MasternodeListError::NoMerkleBlockHeader(block_hash(10)))
    );
    assert_eq!(store.masternode_list_state().unwrap(), None);
}

#[test]
fn coinbase_must_be_matched_in_block() {
    let store = Arc::new(NullStore::new());
    let cb = coinbase(1, &[], &[]);
    store.put_block(&block_with(block_hash(10), &cb)).unwrap();
    let mut diff = DiffBuilder::new(BlockHash::ZERO, block_hash(10), cb).build();
    // Same single-leaf tree, but the leaf is not flagged as matched.
    diff.merkle_flags = vec![0x00];

    assert_eq!(
        manager(store).update_list(&diff),
        Err(MasternodeListError::CoinbaseNotInBlock)
    );
}

#[test]
fn merkle_proof_against_other_root_fails() {
    let store = Arc::new(NullStore::new());
    let cb = coinbase(1, &[], &[]);
    let mut block = block_with(block_hash(10), &cb);
    block.header.merkle_root = [0xee; 32];
    store.put_block(&block).unwrap();
    let diff = DiffBuilder::new(BlockHash::ZERO, block_hash(10), cb).build();

    assert!(matches!(
        manager(store).update_list(&diff),
        Err(MasternodeListError::Merkle(_))
    ));
}

#[test]
fn genesis_base_resyncs_from_empty() {
    let (store, manager) = seeded();
    // Force a resync: checkpoint back to genesis, registries still populated.
    store
        .commit_masternode_list(
            store.masternodes().unwrap(),
            store.quorums().unwrap(),
            MasternodeListState::genesis(),
        )
        .unwrap();

    let mns = vec![masternode(9, 9999)];
    let cb = coinbase(2, &mns, &[]);
    store.put_block(&block_with(block_hash(12), &cb)).unwrap();
    let diff = DiffBuilder::new(BlockHash::ZERO, block_hash(12), cb)
        .add_masternodes(mns.clone())
        .build();

    manager.update_list(&diff).unwrap();
    assert_eq!(store.masternodes().unwrap(), mns);
    assert!(store.quorums().unwrap().is_empty());
}

#[test]
fn failed_commit_keeps_previous_list() {
    let (store, manager) = seeded();
    let final_mns = vec![masternode(1, 9999)];
    let cb = coinbase(2, &final_mns, &[quorum(1), quorum(2)]);
    store.put_block(&block_with(block_hash(11), &cb)).unwrap();
    let diff = DiffBuilder::new(block_hash(10), block_hash(11), cb)
        .delete_masternodes(vec![masternode(2, 0).pro_reg_tx_hash, masternode(3, 0).pro_reg_tx_hash])
        .build();

    store.fail(StoreFault::CommitMasternodeList);
    assert!(matches!(
        manager.update_list(&diff),
        Err(MasternodeListError::Store(StoreError::Backend(_)))
    ));
    assert_eq!(manager.base_block_hash().unwrap(), block_hash(10));
    assert_eq!(store.masternodes().unwrap().len(), 3);

    store.recover(StoreFault::CommitMasternodeList);
    manager.update_list(&diff).unwrap();
    assert_eq!(manager.base_block_hash().unwrap(), block_hash(11));
    assert_eq!(store.masternodes().unwrap().len(), 1);
}
