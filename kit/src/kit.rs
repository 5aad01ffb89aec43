//! The orchestrator.
//!
//! Owns every Dash subsystem, routes decoded messages and peer events to
//! them, and relays their notifications upward through one [`EventBus`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use dashkit_crypto::BlsVerifier;
use dashkit_instantsend::{
    InstantSendLockHandler, InstantSendLockManager, InstantSendLockValidator,
    InstantTransactionManager, LockOutcome,
};
use dashkit_masternode_list::{
    MasternodeListManager, MasternodeListSyncer, QuorumListManager, SyncerEvent, SyncerHandle,
};
use dashkit_messages::{DashMessage, ISLockMessage, TransactionLockRequestMessage, TransactionMessage};
use dashkit_network::{InitialBlockDownload, Peer, PeerEvent};
use dashkit_pow::{network_validator, BlockValidator, BlockValidatorSet};
use dashkit_protocol::MessageCodec;
use dashkit_store::{BlockStore, DashStore, UnspentOutput};
use dashkit_transactions::{FullTransaction, InvalidTransaction};
use dashkit_types::{Block, BlockHash, ChainParams, Clock, Masternode, TxHash};
use dashkit_utils::StatsCounter;
use dashkit_wallet_core::{
    ConfirmedUnspentOutputProvider, EventBus, PublicKeyManager, TransactionEvent,
    TransactionProcessor, UtxoFilters,
};

use crate::{DashTransactionInfo, DashTransactionInfoConverter, KitConfig, KitError};

const STAT_MESSAGES: &str = "messages";
const STAT_PROTOCOL_ERRORS: &str = "protocol_errors";
const STAT_INSTANT_LOCKS: &str = "instant_locks";

/// Result of offering a P2P message to the kit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageOutcome {
    Handled,
    /// Not a Dash extension command; the caller's engine owns it.
    NotHandled,
}

enum SyncerState {
    Idle(MasternodeListSyncer),
    Running(SyncerHandle),
    Stopped,
}

pub struct Kit {
    config: KitConfig,
    params: ChainParams,
    store: Arc<dyn DashStore>,
    codec: MessageCodec,
    block_validator: BlockValidatorSet,
    masternode_list: Arc<MasternodeListManager>,
    syncer: SyncerState,
    processor: TransactionProcessor,
    instant: InstantSendLockHandler,
    info_converter: Arc<DashTransactionInfoConverter>,
    unspent: ConfirmedUnspentOutputProvider,
    events: Arc<EventBus>,
    inserted: Arc<Mutex<Vec<TxHash>>>,
    stats: StatsCounter,
}

impl Kit {
    pub fn new<S: DashStore + 'static>(
        config: KitConfig,
        store: Arc<S>,
        keys: Arc<dyn PublicKeyManager>,
        initial_block_download: Arc<dyn InitialBlockDownload>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, KitError> {
        config.validate()?;
        let params = config.network.params();
        let codec = MessageCodec::new(params.protocol_version)?;

        let block_store: Arc<dyn BlockStore + Send + Sync> = store.clone();
        let store: Arc<dyn DashStore> = store;
        let block_validator =
            network_validator(config.network, block_store, config.first_checkpoint_height);

        let quorums = Arc::new(QuorumListManager::new(Arc::clone(&store)));
        let masternode_list = Arc::new(MasternodeListManager::new(
            Arc::clone(&store),
            Arc::clone(&quorums),
            params.max_block_size,
        ));
        let syncer = MasternodeListSyncer::new(
            Arc::clone(&masternode_list),
            Arc::clone(&store),
            initial_block_download,
            Arc::clone(&clock),
            config.diff_request_timeout_secs,
        );

        let instant_transactions = Arc::new(InstantTransactionManager::new(Arc::clone(&store)));
        let instant = InstantSendLockHandler::new(
            Arc::clone(&instant_transactions),
            InstantSendLockManager::new(InstantSendLockValidator::new(
                quorums,
                Arc::new(BlsVerifier),
                params.instant_send_quorum_type,
            )),
        );
        let info_converter = Arc::new(DashTransactionInfoConverter::new(instant_transactions));

        let events = Arc::new(EventBus::new());
        let inserted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&inserted);
        events.subscribe(Box::new(move |event| {
            if let TransactionEvent::Updated { inserted, .. } = event {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(inserted.iter().map(|t| t.data_hash));
            }
        }));

        let processor = TransactionProcessor::new(
            Arc::clone(&store),
            keys,
            info_converter.clone(),
            clock,
            Arc::clone(&events),
        )?;
        let unspent =
            ConfirmedUnspentOutputProvider::new(Arc::clone(&store), config.confirmations_threshold);

        info!(
            network = params.network.as_str(),
            wallet_id = %config.wallet_id,
            "kit created"
        );

        Ok(Self {
            config,
            params,
            store,
            codec,
            block_validator,
            masternode_list,
            syncer: SyncerState::Idle(syncer),
            processor,
            instant,
            info_converter,
            unspent,
            events,
            inserted,
            stats: StatsCounter::new(&[STAT_MESSAGES, STAT_PROTOCOL_ERRORS, STAT_INSTANT_LOCKS]),
        })
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Move the masternode list syncer onto its own task. Must be called
    /// inside a tokio runtime.
    pub fn start(&mut self) {
        let state = std::mem::replace(&mut self.syncer, SyncerState::Stopped);
        self.syncer = match state {
            SyncerState::Idle(syncer) => {
                info!("masternode list syncer started");
                SyncerState::Running(syncer.spawn())
            }
            other => other,
        };
    }

    pub async fn shutdown(&mut self) {
        if let SyncerState::Running(handle) = std::mem::replace(&mut self.syncer, SyncerState::Stopped) {
            handle.shutdown().await;
            info!("masternode list syncer stopped");
        }
    }

    /// Register an upward listener for transaction changes.
    pub fn subscribe(&self, listener: Box<dyn Fn(&TransactionEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub async fn handle_peer_event(&self, event: PeerEvent) -> Result<(), KitError> {
        self.send_to_syncer(SyncerEvent::Peer(event)).await
    }

    /// Decode and route one P2P message from `peer`. A malformed Dash
    /// message disconnects the peer.
    pub async fn handle_message(
        &self,
        peer: Arc<dyn Peer>,
        command: &str,
        payload: &[u8],
    ) -> Result<MessageOutcome, KitError> {
        if !self.codec.handles(command) {
            return Ok(MessageOutcome::NotHandled);
        }
        self.stats.increment(STAT_MESSAGES);

        let message = match self.codec.decode(command, payload) {
            Ok(message) => message,
            Err(err) => {
                self.stats.increment(STAT_PROTOCOL_ERRORS);
                warn!(peer = %peer.id(), command, %err, "malformed message");
                peer.disconnect(&err.to_string());
                return Err(err.into());
            }
        };

        match message {
            DashMessage::MasternodeListDiff(message) => {
                self.send_to_syncer(SyncerEvent::ListDiff { peer, message })
                    .await?;
            }
            DashMessage::ISLock(lock) => self.handle_lock(lock)?,
            DashMessage::Transaction(TransactionMessage { transaction })
            | DashMessage::TransactionLockRequest(TransactionLockRequestMessage { transaction }) => {
                self.process_transactions(vec![transaction], None)?;
            }
            DashMessage::GetMasternodeListDiff(_) => {
                debug!(peer = %peer.id(), "getmnlistd request ignored");
            }
        }
        Ok(MessageOutcome::Handled)
    }

    /// Header check for a candidate block on top of `previous_block`.
    pub fn validate_block(&self, block: &Block, previous_block: &Block) -> Result<(), KitError> {
        self.block_validator.validate(block, previous_block)?;
        Ok(())
    }

    /// Wallet transactions seen in the mempool or matched in `block`.
    ///
    /// A [`KitError::is_bloom_filter_expired`] error arrives after the
    /// changes are stored; the caller rebuilds its filter.
    pub fn process_transactions(
        &self,
        transactions: Vec<FullTransaction>,
        block: Option<&Block>,
    ) -> Result<(), KitError> {
        let mut locks = Vec::new();
        for transaction in &transactions {
            if let Some(lock) = self.instant.verify_incoming_transaction(transaction)? {
                locks.push(lock);
            }
        }
        let locked: HashSet<TxHash> = locks.iter().map(|lock| lock.tx_hash).collect();

        let result = self
            .processor
            .process_received_locked(transactions, block, false, &locked);
        // Only stored transactions take the lock.
        for lock in locks {
            if self.instant.transactions().stored_transaction(&lock.tx_hash)?.is_some() {
                self.handle_lock(lock)?;
            } else {
                debug!(tx_hash = %lock.tx_hash, "islock dropped, transaction not stored");
            }
        }
        self.check_inserted_locks()?;
        result.map_err(Into::into)
    }

    /// Store a transaction the wallet built and is about to broadcast.
    pub fn send_transaction(&self, transaction: FullTransaction) -> Result<(), KitError> {
        let result = self.processor.process_created(transaction);
        self.check_inserted_locks()?;
        result.map_err(Into::into)
    }

    pub fn invalidate_transaction(&self, hash: &TxHash) -> Result<Vec<InvalidTransaction>, KitError> {
        Ok(self.processor.process_invalid(hash)?)
    }

    pub fn handle_lock(&self, lock: ISLockMessage) -> Result<(), KitError> {
        if let LockOutcome::Instant(hash) = self.instant.handle_lock(lock)? {
            self.notify_instant(&hash)?;
        }
        Ok(())
    }

    pub fn is_instant(&self, hash: &TxHash) -> Result<bool, KitError> {
        Ok(self.instant.transactions().is_instant(hash)?)
    }

    pub fn transaction_info(&self, hash: &TxHash) -> Result<Option<DashTransactionInfo>, KitError> {
        Ok(self
            .store
            .full_transaction(hash)?
            .map(|tx| self.info_converter.transaction_info(&tx)))
    }

    pub fn spendable_utxo(&self, filters: &UtxoFilters) -> Result<Vec<UnspentOutput>, KitError> {
        Ok(self.unspent.spendable_utxo(filters)?)
    }

    pub fn masternodes(&self) -> Result<Vec<Masternode>, KitError> {
        Ok(self.masternode_list.masternodes()?)
    }

    pub fn masternode_list_base_block_hash(&self) -> Result<BlockHash, KitError> {
        Ok(self.masternode_list.base_block_hash()?)
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    async fn send_to_syncer(&self, event: SyncerEvent) -> Result<(), KitError> {
        match &self.syncer {
            SyncerState::Running(handle) => {
                if handle.send(event).await {
                    Ok(())
                } else {
                    Err(KitError::SyncerStopped)
                }
            }
            SyncerState::Idle(_) => Err(KitError::NotStarted),
            SyncerState::Stopped => Err(KitError::SyncerStopped),
        }
    }

    /// Newly stored transactions may have a lock waiting for them.
    fn check_inserted_locks(&self) -> Result<(), KitError> {
        let hashes = std::mem::take(
            &mut *self.inserted.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for hash in hashes {
            if let LockOutcome::Instant(hash) = self.instant.handle_inserted_tx_hash(&hash)? {
                self.notify_instant(&hash)?;
            }
        }
        Ok(())
    }

    fn notify_instant(&self, hash: &TxHash) -> Result<(), KitError> {
        self.stats.increment(STAT_INSTANT_LOCKS);
        if let Some(transaction) = self.store.transaction(hash)? {
            self.events.emit(&TransactionEvent::Updated {
                inserted: Vec::new(),
                updated: vec![transaction],
                block_hash: None,
            });
        }
        Ok(())
    }
}
