//! Peer abstraction.

use std::fmt;

use dashkit_types::BlockHash;

use crate::NetworkError;

/// Identifies a connected peer, typically by its `host:port`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Work the Dash layer hands to a peer. Completion arrives as an inbound
/// message, never as a return value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerTask {
    /// Send `getmnlistd` and expect a `mnlistdiff` back.
    RequestMasternodeListDiff {
        base_block_hash: BlockHash,
        block_hash: BlockHash,
    },
}

/// A connected peer. Calls never block on network I/O.
pub trait Peer: Send + Sync {
    fn id(&self) -> PeerId;

    /// Queue `task` for the peer.
    fn add_task(&self, task: PeerTask) -> Result<(), NetworkError>;

    /// Drop the connection, recording why.
    fn disconnect(&self, reason: &str);
}
