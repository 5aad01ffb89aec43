//! Fundamental types for the DashKit SPV engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! hashes, block headers, masternode and quorum entries, the masternode list
//! checkpoint, timestamps and the per-network chain parameters.

pub mod block;
pub mod error;
pub mod hash;
pub mod masternode;
pub mod network;
pub mod params;
pub mod quorum;
pub mod state;
pub mod time;

pub use block::{Block, BlockHash, BlockHeader};
pub use error::TypesError;
pub use hash::TxHash;
pub use masternode::Masternode;
pub use network::NetworkId;
pub use params::{ChainParams, PowParams};
pub use quorum::{Quorum, QuorumId, QuorumType};
pub use state::MasternodeListState;
pub use time::{Clock, SystemClock, Timestamp};
