//! Masternode list sync: one `getmnlistd` in flight at a time.
//!
//! The syncer is a plain state machine driven by [`SyncerEvent`]s. In a
//! running kit it lives on its own tokio task ([`MasternodeListSyncer::spawn`])
//! so peer callbacks only enqueue events and return.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use dashkit_messages::MasternodeListDiffMessage;
use dashkit_network::{InitialBlockDownload, Peer, PeerEvent, PeerId, PeerTask};
use dashkit_store::DashStore;
use dashkit_types::{Clock, Timestamp};

use crate::{MasternodeListError, MasternodeListManager};

const CHANNEL_BUFFER: usize = 64;
const TIMEOUT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Inputs to the syncer's work loop.
pub enum SyncerEvent {
    Peer(PeerEvent),
    /// A `mnlistdiff` answered by `peer`.
    ListDiff {
        peer: Arc<dyn Peer>,
        message: Box<MasternodeListDiffMessage>,
    },
}

struct WorkingPeer {
    peer: Arc<dyn Peer>,
    requested_at: Timestamp,
}

pub struct MasternodeListSyncer {
    manager: Arc<MasternodeListManager>,
    store: Arc<dyn DashStore>,
    initial_block_download: Arc<dyn InitialBlockDownload>,
    clock: Arc<dyn Clock>,
    request_timeout_secs: u64,
    working: Option<WorkingPeer>,
}

impl MasternodeListSyncer {
    pub fn new(
        manager: Arc<MasternodeListManager>,
        store: Arc<dyn DashStore>,
        initial_block_download: Arc<dyn InitialBlockDownload>,
        clock: Arc<dyn Clock>,
        request_timeout_secs: u64,
    ) -> Self {
        Self {
            manager,
            store,
            initial_block_download,
            clock,
            request_timeout_secs,
            working: None,
        }
    }

    /// The peer serving the outstanding request, if any.
    pub fn working_peer(&self) -> Option<PeerId> {
        self.working.as_ref().map(|w| w.peer.id())
    }

    /// Process one event. Only storage failures are returned; a bad diff
    /// disconnects the peer that sent it.
    pub fn handle(&mut self, event: SyncerEvent) -> Result<(), MasternodeListError> {
        match event {
            SyncerEvent::Peer(PeerEvent::Synced(_)) => self.assign_next_sync_peer(),
            SyncerEvent::Peer(PeerEvent::Disconnected { peer, error }) => {
                if self.working_peer().as_ref() != Some(&peer) {
                    return Ok(());
                }
                tracing::debug!(%peer, ?error, "working peer disconnected");
                self.working = None;
                self.assign_next_sync_peer()
            }
            SyncerEvent::ListDiff { peer, message } => self.on_list_diff(peer, &message),
        }
    }

    /// Give up on a request outstanding longer than the timeout.
    pub fn check_timeout(&mut self) -> Result<(), MasternodeListError> {
        let now = self.clock.now();
        let Some(working) = &self.working else {
            return Ok(());
        };
        if working.requested_at.elapsed_since(now) <= self.request_timeout_secs {
            return Ok(());
        }

        tracing::warn!(peer = %working.peer.id(), "masternode list diff request timed out");
        working.peer.disconnect("masternode list diff request timed out");
        self.working = None;
        self.assign_next_sync_peer()
    }

    fn assign_next_sync_peer(&mut self) -> Result<(), MasternodeListError> {
        if self.working.is_some() {
            return Ok(());
        }
        let Some(last_block) = self.store.last_block()? else {
            return Ok(());
        };
        let Some(peer) = self.initial_block_download.synced_peers().into_iter().next() else {
            return Ok(());
        };

        let block_hash = last_block.hash();
        let base_block_hash = self.manager.base_block_hash()?;
        if block_hash == base_block_hash {
            return Ok(());
        }

        let task = PeerTask::RequestMasternodeListDiff {
            base_block_hash,
            block_hash,
        };
        if let Err(err) = peer.add_task(task) {
            tracing::warn!(peer = %peer.id(), %err, "could not queue masternode list diff request");
            return Ok(());
        }

        tracing::debug!(peer = %peer.id(), %base_block_hash, %block_hash, "requested masternode list diff");
        self.working = Some(WorkingPeer {
            peer,
            requested_at: self.clock.now(),
        });
        Ok(())
    }

    fn on_list_diff(
        &mut self,
        peer: Arc<dyn Peer>,
        message: &MasternodeListDiffMessage,
    ) -> Result<(), MasternodeListError> {
        let from_working = self
            .working
            .as_ref()
            .is_some_and(|w| w.peer.id() == peer.id());
        if !from_working {
            tracing::debug!(peer = %peer.id(), "ignoring unsolicited masternode list diff");
            return Ok(());
        }

        // The request is finished either way; the next synced event retries.
        self.working = None;
        match self.manager.update_list(message) {
            Ok(()) => Ok(()),
            Err(err @ MasternodeListError::Store(_)) => Err(err),
            Err(err) => {
                tracing::warn!(peer = %peer.id(), %err, "masternode list diff rejected");
                peer.disconnect(&err.to_string());
                Ok(())
            }
        }
    }

    /// Move the syncer onto its own task.
    pub fn spawn(self) -> SyncerHandle {
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER);
        let task = tokio::spawn(self.run(event_rx));
        SyncerHandle { event_tx, task }
    }

    async fn run(mut self, mut event_rx: mpsc::Receiver<SyncerEvent>) {
        let mut interval = tokio::time::interval(TIMEOUT_CHECK_INTERVAL);
        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else { break };
                    if let Err(err) = self.handle(event) {
                        tracing::error!(%err, "masternode list sync step failed");
                    }
                }
                _ = interval.tick() => {
                    if let Err(err) = self.check_timeout() {
                        tracing::warn!(%err, "masternode list timeout check failed");
                    }
                }
            }
        }
        tracing::debug!("masternode list syncer stopped");
    }
}

/// Sending side of a spawned syncer.
pub struct SyncerHandle {
    event_tx: mpsc::Sender<SyncerEvent>,
    task: JoinHandle<()>,
}

impl SyncerHandle {
    /// Queue an event. Returns `false` once the syncer has stopped.
    pub async fn send(&self, event: SyncerEvent) -> bool {
        self.event_tx.send(event).await.is_ok()
    }

    /// Stop accepting events and wait for the queued ones to finish.
    pub async fn shutdown(self) {
        drop(self.event_tx);
        if let Err(err) = self.task.await {
            tracing::error!(%err, "masternode list syncer task failed");
        }
    }
}
