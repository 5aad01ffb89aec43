//! Nullable peers: record tasks and disconnects instead of doing I/O.

use std::sync::{Arc, Mutex};

use dashkit_network::{InitialBlockDownload, NetworkError, Peer, PeerId, PeerTask};

/// A peer that records every task and disconnect request.
#[derive(Debug)]
pub struct NullPeer {
    id: PeerId,
    tasks: Mutex<Vec<PeerTask>>,
    disconnects: Mutex<Vec<String>>,
    reject_tasks: bool,
}

impl NullPeer {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self::build(id, false))
    }

    /// A peer whose task queue is always closed.
    pub fn closed(id: &str) -> Arc<Self> {
        Arc::new(Self::build(id, true))
    }

    fn build(id: &str, reject_tasks: bool) -> Self {
        Self {
            id: PeerId::new(id),
            tasks: Mutex::new(Vec::new()),
            disconnects: Mutex::new(Vec::new()),
            reject_tasks,
        }
    }

    /// All tasks queued so far (for assertions).
    pub fn tasks(&self) -> Vec<PeerTask> {
        self.tasks.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Reasons passed to `disconnect`, in call order.
    pub fn disconnects(&self) -> Vec<String> {
        self.disconnects.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn is_disconnected(&self) -> bool {
        !self.disconnects().is_empty()
    }
}

impl Peer for NullPeer {
    fn id(&self) -> PeerId {
        self.id.clone()
    }

    fn add_task(&self, task: PeerTask) -> Result<(), NetworkError> {
        if self.reject_tasks {
            return Err(NetworkError::ChannelClosed(self.id.clone()));
        }
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(task);
        }
        Ok(())
    }

    fn disconnect(&self, reason: &str) {
        if let Ok(mut disconnects) = self.disconnects.lock() {
            disconnects.push(reason.to_string());
        }
    }
}

/// Programmable set of synced peers.
#[derive(Default)]
pub struct NullInitialBlockDownload {
    peers: Mutex<Vec<Arc<dyn Peer>>>,
}

impl NullInitialBlockDownload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_synced(&self, peer: Arc<dyn Peer>) {
        if let Ok(mut peers) = self.peers.lock() {
            peers.push(peer);
        }
    }

    pub fn remove(&self, id: &PeerId) {
        if let Ok(mut peers) = self.peers.lock() {
            peers.retain(|p| &p.id() != id);
        }
    }
}

impl InitialBlockDownload for NullInitialBlockDownload {
    fn synced_peers(&self) -> Vec<Arc<dyn Peer>> {
        self.peers.lock().map(|p| p.clone()).unwrap_or_default()
    }
}
