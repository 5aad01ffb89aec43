use thiserror::Error;

use crate::PeerId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("peer {0} not found")]
    PeerNotFound(PeerId),

    #[error("task queue for peer {0} is full")]
    QueueFull(PeerId),

    #[error("peer {0} is closed")]
    ChannelClosed(PeerId),
}
