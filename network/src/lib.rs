//! Peer boundary of the DashKit extension layer.
//!
//! Connection management and socket I/O belong to the underlying engine. This
//! crate defines what the Dash layer needs from it:
//! - [`Peer`]: a connected peer that accepts fire-and-forget tasks
//! - [`PeerTask`]: work the Dash layer asks a peer to perform
//! - [`PeerEvent`]: peer-group and initial-block-download notifications
//! - [`InitialBlockDownload`]: which peers have reached the synced head
//! - [`ChannelPeer`]: a [`Peer`] that forwards commands over a tokio channel

pub mod channel;
pub mod error;
pub mod events;
pub mod peer;

pub use channel::{ChannelPeer, PeerCommand, PeerHandle};
pub use error::NetworkError;
pub use events::{InitialBlockDownload, PeerEvent};
pub use peer::{Peer, PeerId, PeerTask};
