mod common;

use std::sync::Arc;

use common::*;
use dashkit_masternode_list::{
    MasternodeListError, MasternodeListManager, MasternodeListSyncer, QuorumListManager,
    SyncerEvent,
};
use dashkit_network::{Peer, PeerEvent, PeerId, PeerTask};
use dashkit_nullables::{NullClock, NullInitialBlockDownload, NullPeer, NullStore, StoreFault};
use dashkit_store::{BlockStore, MasternodeListStore, StoreError};
use dashkit_types::{BlockHash, MasternodeListState};

struct Harness {
    store: Arc<NullStore>,
    ibd: Arc<NullInitialBlockDownload>,
    clock: Arc<NullClock>,
    syncer: MasternodeListSyncer,
}

fn harness() -> Harness {
    harness_with(NullStore::new())
}

fn harness_with(store: NullStore) -> Harness {
    let store = Arc::new(store);
    let ibd = Arc::new(NullInitialBlockDownload::new());
    let clock = Arc::new(NullClock::new(1_000));
    let quorums = Arc::new(QuorumListManager::new(store.clone()));
    let manager = Arc::new(MasternodeListManager::new(store.clone(), quorums, 2_000_000_000));
    let syncer = MasternodeListSyncer::new(manager, store.clone(), ibd.clone(), clock.clone(), 60);
    Harness {
        store,
        ibd,
        clock,
        syncer,
    }
}

/// Store a tip block whose coinbase commits to masternode 1.
fn tip(store: &NullStore, hash: BlockHash) -> dashkit_messages::MasternodeListDiffMessage {
    let mns = vec![masternode(1, 9999)];
    let cb = coinbase(1, &mns, &[]);
    store.put_block(&block_with(hash, &cb)).unwrap();
    DiffBuilder::new(BlockHash::ZERO, hash, cb)
        .add_masternodes(mns)
        .build()
}

fn request(base: BlockHash, block: BlockHash) -> PeerTask {
    PeerTask::RequestMasternodeListDiff {
        base_block_hash: base,
        block_hash: block,
    }
}

#[test]
fn synced_peer_gets_one_request() {
    let mut h = harness();
    tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    let b = NullPeer::new("b");
    h.ibd.add_synced(a.clone());
    h.ibd.add_synced(b.clone());

    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(b.clone()))).unwrap();

    assert_eq!(a.tasks(), vec![request(BlockHash::ZERO, block_hash(10))]);
    assert!(b.tasks().is_empty());
    assert_eq!(h.syncer.working_peer(), Some(PeerId::new("a")));
}

#[test]
fn no_request_when_checkpoint_is_tip() {
    let mut h = harness();
    tip(&h.store, block_hash(10));
    h.store
        .commit_masternode_list(vec![], vec![], MasternodeListState::new(block_hash(10)))
        .unwrap();
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());

    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    assert!(a.tasks().is_empty());
    assert_eq!(h.syncer.working_peer(), None);
}

#[test]
fn working_peer_disconnect_reassigns() {
    let mut h = harness();
    tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    let b = NullPeer::new("b");
    h.ibd.add_synced(a.clone());
    h.ibd.add_synced(b.clone());
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    h.ibd.remove(&a.id());
    h.syncer
        .handle(SyncerEvent::Peer(PeerEvent::Disconnected {
            peer: a.id(),
            error: None,
        }))
        .unwrap();

    assert_eq!(b.tasks(), vec![request(BlockHash::ZERO, block_hash(10))]);
    assert_eq!(h.syncer.working_peer(), Some(PeerId::new("b")));
}

#[test]
fn other_peer_disconnect_is_ignored() {
    let mut h = harness();
    tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    h.syncer
        .handle(SyncerEvent::Peer(PeerEvent::Disconnected {
            peer: PeerId::new("z"),
            error: Some("reset".into()),
        }))
        .unwrap();

    assert_eq!(a.tasks().len(), 1);
    assert_eq!(h.syncer.working_peer(), Some(PeerId::new("a")));
}

#[test]
fn valid_diff_advances_checkpoint_and_frees_peer() {
    let mut h = harness();
    let diff = tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    h.syncer
        .handle(SyncerEvent::ListDiff {
            peer: a.clone(),
            message: Box::new(diff),
        })
        .unwrap();

    assert_eq!(h.syncer.working_peer(), None);
    assert!(!a.is_disconnected());
    assert_eq!(
        h.store.masternode_list_state().unwrap(),
        Some(MasternodeListState::new(block_hash(10)))
    );
}

#[test]
fn invalid_diff_disconnects_peer() {
    let mut h = harness();
    let mut diff = tip(&h.store, block_hash(10));
    diff.mn_list.push(masternode(2, 9999));
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    h.syncer
        .handle(SyncerEvent::ListDiff {
            peer: a.clone(),
            message: Box::new(diff),
        })
        .unwrap();

    assert!(a.is_disconnected());
    assert_eq!(h.syncer.working_peer(), None);
    assert_eq!(h.store.masternode_list_state().unwrap(), None);
}

#[test]
fn store_failure_is_returned_and_peer_kept() {
    let mut h = harness_with(NullStore::failing_commit());
    let diff = tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    let result = h.syncer.handle(SyncerEvent::ListDiff {
        peer: a.clone(),
        message: Box::new(diff.clone()),
    });

    assert!(matches!(
        result,
        Err(MasternodeListError::Store(StoreError::Backend(_)))
    ));
    assert!(!a.is_disconnected());
    assert_eq!(h.syncer.working_peer(), None);
    assert_eq!(h.store.masternode_list_state().unwrap(), None);

    // Once the backend recovers, the next synced event retries the same diff.
    h.store.recover(StoreFault::CommitMasternodeList);
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();
    assert_eq!(a.tasks().len(), 2);
    h.syncer
        .handle(SyncerEvent::ListDiff {
            peer: a.clone(),
            message: Box::new(diff),
        })
        .unwrap();
    assert_eq!(
        h.store.masternode_list_state().unwrap(),
        Some(MasternodeListState::new(block_hash(10)))
    );
}

#[test]
fn unsolicited_diff_is_ignored() {
    let mut h = harness();
    let diff = tip(&h.store, block_hash(10));
    let stranger = NullPeer::new("s");

    h.syncer
        .handle(SyncerEvent::ListDiff {
            peer: stranger.clone(),
            message: Box::new(diff),
        })
        .unwrap();

    assert!(!stranger.is_disconnected());
    assert_eq!(h.store.masternode_list_state().unwrap(), None);
}

#[test]
fn closed_peer_is_not_marked_working() {
    let mut h = harness();
    tip(&h.store, block_hash(10));
    let closed = NullPeer::closed("c");
    h.ibd.add_synced(closed.clone());

    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(closed))).unwrap();

    assert_eq!(h.syncer.working_peer(), None);
}

#[test]
fn stalled_request_times_out() {
    let mut h = harness();
    tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());
    h.syncer.handle(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).unwrap();

    h.clock.advance(60);
    h.syncer.check_timeout().unwrap();
    assert!(!a.is_disconnected());

    h.ibd.remove(&a.id());
    h.clock.advance(1);
    h.syncer.check_timeout().unwrap();
    assert!(a.is_disconnected());
    assert_eq!(h.syncer.working_peer(), None);
}

#[tokio::test]
async fn spawned_syncer_processes_queued_events() {
    let h = harness();
    let diff = tip(&h.store, block_hash(10));
    let a = NullPeer::new("a");
    h.ibd.add_synced(a.clone());
    let store = h.store.clone();

    let handle = h.syncer.spawn();
    assert!(handle.send(SyncerEvent::Peer(PeerEvent::Synced(a.clone()))).await);
    assert!(
        handle
            .send(SyncerEvent::ListDiff {
                peer: a.clone(),
                message: Box::new(diff),
            })
            .await
    );
    handle.shutdown().await;

    assert_eq!(a.tasks().len(), 1);
    assert_eq!(
        store.masternode_list_state().unwrap(),
        Some(MasternodeListState::new(block_hash(10)))
    );
}
