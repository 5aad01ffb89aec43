//! Channel-backed peer.
//!
//! [`ChannelPeer`] is what the Dash layer holds; the companion [`PeerHandle`]
//! is given to the connection that owns the socket, which reads commands from
//! `command_rx` and performs the I/O.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::{NetworkError, Peer, PeerId, PeerTask};

/// Channel buffer size for peer commands.
const CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCommand {
    Task(PeerTask),
    Disconnect { reason: String },
}

pub struct ChannelPeer {
    id: PeerId,
    command_tx: mpsc::Sender<PeerCommand>,
}

/// Handle given to the connection layer.
pub struct PeerHandle {
    pub id: PeerId,
    pub command_rx: mpsc::Receiver<PeerCommand>,
}

impl ChannelPeer {
    /// Create a `ChannelPeer` and its companion [`PeerHandle`].
    pub fn new(id: PeerId) -> (Self, PeerHandle) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_BUFFER);
        let handle = PeerHandle {
            id: id.clone(),
            command_rx,
        };
        (Self { id, command_tx }, handle)
    }

    fn send(&self, command: PeerCommand) -> Result<(), NetworkError> {
        self.command_tx.try_send(command).map_err(|err| match err {
            TrySendError::Full(_) => NetworkError::QueueFull(self.id.clone()),
            TrySendError::Closed(_) => NetworkError::ChannelClosed(self.id.clone()),
        })
    }
}

impl Peer for ChannelPeer {
    fn id(&self) -> PeerId {
        self.id.clone()
    }

    fn add_task(&self, task: PeerTask) -> Result<(), NetworkError> {
        self.send(PeerCommand::Task(task))
    }

    fn disconnect(&self, reason: &str) {
        if let Err(err) = self.send(PeerCommand::Disconnect {
            reason: reason.to_string(),
        }) {
            tracing::debug!(peer = %self.id, %err, "disconnect not delivered");
        }
    }
}
