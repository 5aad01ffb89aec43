use std::sync::Arc;

use blst::min_pk::SecretKey;
use dashkit_crypto::bls::BLS_BASIC_DST;
use dashkit_crypto::BlsVerifier;
use dashkit_instantsend::{
    sign_id, InstantSendLockHandler, InstantSendLockManager, InstantSendLockValidator,
    InstantTransactionManager, LockOutcome,
};
use dashkit_masternode_list::QuorumListManager;
use dashkit_messages::ISLockMessage;
use dashkit_nullables::NullStore;
use dashkit_protocol::islock::new_lock;
use dashkit_protocol::quorum::new_commitment;
use dashkit_store::{InstantLockStore, MasternodeListStore, TransactionStore};
use dashkit_transactions::{script, FullTransaction, Input, Outpoint, Output, Transaction};
use dashkit_types::{BlockHash, MasternodeListState, Quorum, QuorumType, TxHash};

struct Fixture {
    store: Arc<NullStore>,
    quorum: Quorum,
    secret: SecretKey,
    handler: InstantSendLockHandler,
}

fn secret(seed: u8) -> SecretKey {
    SecretKey::key_gen(&[seed; 32], &[]).unwrap()
}

impl Fixture {
    fn new() -> Self {
        Self::with_quorums(true)
    }

    fn with_quorums(with_quorum: bool) -> Self {
        let store = Arc::new(NullStore::new());
        let secret = secret(1);
        let quorum = new_commitment(
            1,
            QuorumType::Llmq50_60.as_u8(),
            BlockHash::new([5; 32]),
            None,
            50,
            secret.sk_to_pk().compress().to_vec(),
            vec![0; 96],
            vec![0; 96],
        );
        let quorums = if with_quorum { vec![quorum.clone()] } else { vec![] };
        store
            .commit_masternode_list(vec![], quorums, MasternodeListState::new(BlockHash::new([9; 32])))
            .unwrap();

        let validator = InstantSendLockValidator::new(
            Arc::new(QuorumListManager::new(store.clone())),
            Arc::new(BlsVerifier),
            QuorumType::Llmq50_60,
        );
        let handler = InstantSendLockHandler::new(
            Arc::new(InstantTransactionManager::new(store.clone())),
            InstantSendLockManager::new(validator),
        );
        Self {
            store,
            quorum,
            secret,
            handler,
        }
    }

    /// A lock over `inputs` for `tx_hash` signed by `signer`.
    fn lock_signed_by(&self, signer: &SecretKey, inputs: Vec<Outpoint>, tx_hash: TxHash) -> ISLockMessage {
        let unsigned = new_lock(inputs.clone(), tx_hash, vec![]);
        let digest = sign_id(&self.quorum, &unsigned);
        let signature = signer.sign(&digest, BLS_BASIC_DST, &[]).compress().to_vec();
        new_lock(inputs, tx_hash, signature)
    }

    fn lock_for(&self, tx: &FullTransaction) -> ISLockMessage {
        let inputs = tx.inputs.iter().map(|i| i.previous_output).collect();
        self.lock_signed_by(&self.secret, inputs, tx.hash())
    }

    fn is_instant(&self, tx: &FullTransaction) -> bool {
        self.store.is_instant(&tx.hash()).unwrap()
    }
}

fn outpoint(n: u8) -> Outpoint {
    Outpoint::new(TxHash::new([n; 32]), 0)
}

fn tx(inputs: &[Outpoint], nonce: u32) -> FullTransaction {
    FullTransaction::new(
        Transaction::new(2, 0, nonce),
        inputs.iter().map(|o| Input::new(*o, vec![], 0)).collect(),
        vec![Output::new(1_000, 0, script::p2pkh(&[7; 20]))],
    )
}

#[test]
fn valid_lock_makes_known_transaction_instant() {
    let f = Fixture::new();
    let t = tx(&[outpoint(1), outpoint(2)], 1);
    f.store.add_transaction(&t).unwrap();

    let lock = f.lock_for(&t);
    assert_eq!(f.handler.handle_lock(lock.clone()).unwrap(), LockOutcome::Instant(t.hash()));
    assert!(f.is_instant(&t));
    assert_eq!(f.handler.handle_lock(lock).unwrap(), LockOutcome::AlreadyInstant);
}

#[test]
fn lock_for_unknown_transaction_waits() {
    let f = Fixture::new();
    let t = tx(&[outpoint(1)], 1);

    assert_eq!(f.handler.handle_lock(f.lock_for(&t)).unwrap(), LockOutcome::Pending);
    assert_eq!(f.handler.pending_count(), 1);
    assert!(!f.is_instant(&t));

    f.store.add_transaction(&t).unwrap();
    assert_eq!(
        f.handler.handle_inserted_tx_hash(&t.hash()).unwrap(),
        LockOutcome::Instant(t.hash())
    );
    assert_eq!(f.handler.pending_count(), 0);
    assert!(f.is_instant(&t));
}

#[test]
fn inserted_transaction_without_lock_is_noop() {
    let f = Fixture::new();
    assert_eq!(
        f.handler.handle_inserted_tx_hash(&TxHash::new([4; 32])).unwrap(),
        LockOutcome::Dropped
    );
}

#[test]
fn lock_signed_by_wrong_key_is_dropped() {
    let f = Fixture::new();
    let t = tx(&[outpoint(1)], 1);
    f.store.add_transaction(&t).unwrap();

    let forged = f.lock_signed_by(&secret(2), vec![outpoint(1)], t.hash());
    assert_eq!(f.handler.handle_lock(forged).unwrap(), LockOutcome::Dropped);
    assert!(!f.is_instant(&t));
}

#[test]
fn lock_without_quorum_is_dropped() {
    let f = Fixture::with_quorums(false);
    let t = tx(&[outpoint(1)], 1);
    f.store.add_transaction(&t).unwrap();

    assert_eq!(f.handler.handle_lock(f.lock_for(&t)).unwrap(), LockOutcome::Dropped);
    assert!(!f.is_instant(&t));
}

#[test]
fn lock_must_cover_every_input() {
    let f = Fixture::new();
    let t = tx(&[outpoint(1), outpoint(2)], 1);
    f.store.add_transaction(&t).unwrap();

    let partial = f.lock_signed_by(&f.secret, vec![outpoint(1)], t.hash());
    assert_eq!(f.handler.handle_lock(partial).unwrap(), LockOutcome::Dropped);
    assert!(!f.is_instant(&t));
}

#[test]
fn first_valid_lock_wins_over_conflicting_spend() {
    let f = Fixture::new();
    let first = tx(&[outpoint(1)], 1);
    let second = tx(&[outpoint(1)], 2);
    f.store.add_transaction(&first).unwrap();
    f.store.add_transaction(&second).unwrap();

    assert_eq!(
        f.handler.handle_lock(f.lock_for(&first)).unwrap(),
        LockOutcome::Instant(first.hash())
    );
    assert_eq!(
        f.handler.handle_lock(f.lock_for(&second)).unwrap(),
        LockOutcome::Dropped
    );
    assert!(f.is_instant(&first));
    assert!(!f.is_instant(&second));
}

#[test]
fn sign_id_binds_transaction_hash() {
    let f = Fixture::new();
    let a = new_lock(vec![outpoint(1)], TxHash::new([1; 32]), vec![]);
    let b = new_lock(vec![outpoint(1)], TxHash::new([2; 32]), vec![]);
    assert_ne!(sign_id(&f.quorum, &a), sign_id(&f.quorum, &b));
}

#[test]
fn held_lock_is_verified_against_incoming_transaction_without_recording() {
    let f = Fixture::new();
    let stored = tx(&[outpoint(1)], 1);
    let incoming = tx(&[outpoint(1)], 2);
    f.store.add_transaction(&stored).unwrap();

    let lock = f.lock_for(&incoming);
    assert_eq!(f.handler.handle_lock(lock.clone()).unwrap(), LockOutcome::Pending);
    assert_eq!(
        f.handler.verify_incoming_transaction(&incoming).unwrap(),
        Some(lock.clone())
    );
    assert!(!f.is_instant(&incoming));
    assert_eq!(f.handler.pending_count(), 0);

    f.store.add_transaction(&incoming).unwrap();
    assert_eq!(
        f.handler.handle_lock(lock).unwrap(),
        LockOutcome::Instant(incoming.hash())
    );
    assert!(f.is_instant(&incoming));
}

#[test]
fn held_lock_with_bad_signature_fails_verification() {
    let f = Fixture::new();
    let incoming = tx(&[outpoint(1)], 1);
    let forged = f.lock_signed_by(&secret(99), vec![outpoint(1)], incoming.hash());
    f.handler.handle_lock(forged).unwrap();

    assert_eq!(f.handler.verify_incoming_transaction(&incoming).unwrap(), None);
    assert_eq!(f.handler.pending_count(), 0);
    assert!(!f.is_instant(&incoming));
}

#[test]
fn incoming_transaction_without_held_lock_is_untouched() {
    let f = Fixture::new();
    let incoming = tx(&[outpoint(1)], 1);
    assert_eq!(f.handler.verify_incoming_transaction(&incoming).unwrap(), None);
    assert!(!f.is_instant(&incoming));
}
