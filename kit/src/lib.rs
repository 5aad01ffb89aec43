//! DashKit: the Dash extension layer of an SPV wallet.
//!
//! [`Kit`] wires header validation, masternode list sync, wallet
//! transaction processing and InstantSend together over one
//! [`DashStore`](dashkit_store::DashStore), and dispatches the Dash P2P
//! messages it understands.

pub mod config;
pub mod dash_transaction_info;
pub mod error;
pub mod kit;

pub use config::KitConfig;
pub use dash_transaction_info::{DashTransactionInfo, DashTransactionInfoConverter};
pub use error::KitError;
pub use kit::{Kit, MessageOutcome};
