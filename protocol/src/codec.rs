//! Command-keyed message codec.
//!
//! Each supported P2P command has a [`MessageParser`] registered in
//! [`MessageCodec`]. Commands without a parser are reported as
//! [`ProtocolError::UnknownCommand`] so the caller can hand them to the
//! generic sync engine.

use std::collections::HashMap;

use dashkit_messages::{command, DashMessage, TransactionLockRequestMessage, TransactionMessage};
use dashkit_transactions::serialize;
use dashkit_utils::ByteReader;

use crate::version::is_compatible;
use crate::{islock, mnlistdiff, ProtocolError};

/// Maximum accepted payload size (Dash `MAX_PROTOCOL_MESSAGE_LENGTH`).
pub const MAX_MESSAGE_SIZE: usize = 3 * 1024 * 1024;

/// Decodes the payload of one command.
pub trait MessageParser: Send + Sync {
    fn command(&self) -> &'static str;
    fn parse(&self, payload: &[u8], protocol_version: i32) -> Result<DashMessage, ProtocolError>;
}

struct GetMasternodeListDiffParser;

impl MessageParser for GetMasternodeListDiffParser {
    fn command(&self) -> &'static str {
        command::GET_MN_LIST_DIFF
    }

    fn parse(&self, payload: &[u8], _: i32) -> Result<DashMessage, ProtocolError> {
        mnlistdiff::parse_request(payload).map(DashMessage::GetMasternodeListDiff)
    }
}

struct MasternodeListDiffParser;

impl MessageParser for MasternodeListDiffParser {
    fn command(&self) -> &'static str {
        command::MN_LIST_DIFF
    }

    fn parse(&self, payload: &[u8], protocol_version: i32) -> Result<DashMessage, ProtocolError> {
        mnlistdiff::parse(payload, protocol_version)
            .map(|diff| DashMessage::MasternodeListDiff(Box::new(diff)))
    }
}

struct ISLockParser;

impl MessageParser for ISLockParser {
    fn command(&self) -> &'static str {
        command::ISLOCK
    }

    fn parse(&self, payload: &[u8], _: i32) -> Result<DashMessage, ProtocolError> {
        islock::parse(payload).map(DashMessage::ISLock)
    }
}

fn parse_transaction(payload: &[u8]) -> Result<dashkit_transactions::FullTransaction, ProtocolError> {
    let mut reader = ByteReader::new(payload);
    let transaction = serialize::deserialize(&mut reader)?;
    if !reader.is_empty() {
        return Err(ProtocolError::Malformed(format!(
            "{} trailing bytes after transaction",
            reader.remaining()
        )));
    }
    Ok(transaction)
}

struct TransactionParser;

impl MessageParser for TransactionParser {
    fn command(&self) -> &'static str {
        command::TRANSACTION
    }

    fn parse(&self, payload: &[u8], _: i32) -> Result<DashMessage, ProtocolError> {
        let transaction = parse_transaction(payload)?;
        Ok(DashMessage::Transaction(TransactionMessage { transaction }))
    }
}

struct TransactionLockRequestParser;

impl MessageParser for TransactionLockRequestParser {
    fn command(&self) -> &'static str {
        command::TRANSACTION_LOCK_REQUEST
    }

    fn parse(&self, payload: &[u8], _: i32) -> Result<DashMessage, ProtocolError> {
        let transaction = parse_transaction(payload)?;
        Ok(DashMessage::TransactionLockRequest(
            TransactionLockRequestMessage { transaction },
        ))
    }
}

/// Parser registry bound to the negotiated protocol version.
pub struct MessageCodec {
    protocol_version: i32,
    parsers: HashMap<&'static str, Box<dyn MessageParser>>,
}

impl MessageCodec {
    /// A codec with every extension-layer parser registered.
    pub fn new(protocol_version: i32) -> Result<Self, ProtocolError> {
        if !is_compatible(protocol_version) {
            return Err(ProtocolError::UnsupportedVersion(protocol_version));
        }
        let mut codec = Self {
            protocol_version,
            parsers: HashMap::new(),
        };
        codec.register(Box::new(GetMasternodeListDiffParser));
        codec.register(Box::new(MasternodeListDiffParser));
        codec.register(Box::new(ISLockParser));
        codec.register(Box::new(TransactionParser));
        codec.register(Box::new(TransactionLockRequestParser));
        Ok(codec)
    }

    pub fn protocol_version(&self) -> i32 {
        self.protocol_version
    }

    /// Adds or replaces the parser for its command.
    pub fn register(&mut self, parser: Box<dyn MessageParser>) {
        self.parsers.insert(parser.command(), parser);
    }

    pub fn handles(&self, command: &str) -> bool {
        self.parsers.contains_key(command)
    }

    pub fn decode(&self, command: &str, payload: &[u8]) -> Result<DashMessage, ProtocolError> {
        if payload.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: payload.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let parser = self
            .parsers
            .get(command)
            .ok_or_else(|| ProtocolError::UnknownCommand(command.to_string()))?;
        parser.parse(payload, self.protocol_version).map_err(|e| {
            tracing::debug!(command, size = payload.len(), error = %e, "failed to parse message");
            e
        })
    }

    /// Encodes `message` into its payload; the command is `message.command()`.
    pub fn encode(&self, message: &DashMessage) -> Vec<u8> {
        match message {
            DashMessage::GetMasternodeListDiff(request) => mnlistdiff::serialize_request(request),
            DashMessage::MasternodeListDiff(diff) => {
                mnlistdiff::serialize(diff, self.protocol_version)
            }
            DashMessage::ISLock(lock) => islock::serialize(lock),
            DashMessage::Transaction(TransactionMessage { transaction })
            | DashMessage::TransactionLockRequest(TransactionLockRequestMessage { transaction }) => {
                serialize::serialize(transaction)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashkit_messages::GetMasternodeListDiffMessage;
    use dashkit_transactions::{script, FullTransaction, Input, Outpoint, Output, Transaction};
    use dashkit_types::{BlockHash, TxHash};

    fn codec() -> MessageCodec {
        MessageCodec::new(70228).unwrap()
    }

    fn transaction() -> FullTransaction {
        FullTransaction::new(
            Transaction::new(1, 0, 0),
            vec![Input::new(Outpoint::new(TxHash::new([1; 32]), 0), vec![], u32::MAX)],
            vec![Output::new(10_000, 0, script::p2pkh(&[2; 20]))],
        )
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            codec().decode("headers", &[]),
            Err(ProtocolError::UnknownCommand("headers".into()))
        );
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; MAX_MESSAGE_SIZE + 1];
        assert!(matches!(
            codec().decode(command::ISLOCK, &payload),
            Err(ProtocolError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn incompatible_version_is_rejected() {
        assert!(matches!(
            MessageCodec::new(70001),
            Err(ProtocolError::UnsupportedVersion(70001))
        ));
    }

    #[test]
    fn ix_decodes_as_lock_request() {
        let codec = codec();
        let message = DashMessage::TransactionLockRequest(TransactionLockRequestMessage {
            transaction: transaction(),
        });
        let payload = codec.encode(&message);
        assert_eq!(codec.decode(message.command(), &payload).unwrap(), message);
    }

    #[test]
    fn tx_with_trailing_bytes_is_malformed() {
        let codec = codec();
        let mut payload = serialize::serialize(&transaction());
        payload.push(0xff);
        assert!(matches!(
            codec.decode(command::TRANSACTION, &payload),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn getmnlistd_roundtrip() {
        let codec = codec();
        let message = DashMessage::GetMasternodeListDiff(GetMasternodeListDiffMessage {
            base_block_hash: BlockHash::ZERO,
            block_hash: BlockHash::new([5; 32]),
        });
        assert!(codec.handles("getmnlistd"));
        let payload = codec.encode(&message);
        assert_eq!(codec.decode("getmnlistd", &payload).unwrap(), message);
    }
}
