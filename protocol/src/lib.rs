//! Dash wire protocol for the extension-layer messages.
//!
//! Parsers are registered per P2P command in [`MessageCodec`]; field layouts
//! that changed across protocol versions are gated by the constants in
//! [`version`].

pub mod codec;
pub mod coinbase;
pub mod error;
pub mod islock;
pub mod masternode;
pub mod mnlistdiff;
pub mod quorum;
pub mod version;

pub use codec::{MessageCodec, MessageParser, MAX_MESSAGE_SIZE};
pub use error::ProtocolError;
pub use version::PROTOCOL_VERSION;
