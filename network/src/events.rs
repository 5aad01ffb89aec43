//! Peer-group and initial-block-download notifications.

use std::fmt;
use std::sync::Arc;

use crate::{Peer, PeerId};

/// Events the Dash layer reacts to.
#[derive(Clone)]
pub enum PeerEvent {
    /// The peer's best block equals ours; it can serve Dash requests.
    Synced(Arc<dyn Peer>),
    /// The peer went away, with an optional error description.
    Disconnected { peer: PeerId, error: Option<String> },
}

impl fmt::Debug for PeerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced(peer) => write!(f, "Synced({})", peer.id()),
            Self::Disconnected { peer, error } => f
                .debug_struct("Disconnected")
                .field("peer", peer)
                .field("error", error)
                .finish(),
        }
    }
}

/// Read access to the initial-block-download state of the peer group.
pub trait InitialBlockDownload: Send + Sync {
    /// Peers currently at the synced head, in connection order.
    fn synced_peers(&self) -> Vec<Arc<dyn Peer>>;
}
