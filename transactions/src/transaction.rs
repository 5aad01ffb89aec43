//! Transaction header row.

use dashkit_types::{BlockHash, Timestamp, TxHash};
use serde::{Deserialize, Serialize};

pub const TX_TYPE_CLASSIC: u16 = 0;
pub const TX_TYPE_COINBASE: u16 = 5;

/// Lifecycle of a stored transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Created or received, not yet seen relayed back by the network.
    #[default]
    New,
    /// Seen in the mempool of a peer or in a block.
    Relayed,
    /// Lost a double-spend adjudication. Irreversible.
    Invalid,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub data_hash: TxHash,
    pub version: u16,
    /// Dash special transaction type (DIP-0002); 0 for classic transactions.
    pub tx_type: u16,
    pub lock_time: u32,
    /// Raw special payload, present when `version >= 3 && tx_type != 0`.
    pub extra_payload: Vec<u8>,
    /// Block time once confirmed, otherwise first-seen time.
    pub timestamp: Timestamp,
    /// Position within the block or processing batch.
    pub order: u32,
    pub block_hash: Option<BlockHash>,
    pub is_mine: bool,
    pub is_outgoing: bool,
    pub status: TransactionStatus,
    /// Hash of the transaction that won a conflict against this one.
    pub conflicting_tx_hash: Option<TxHash>,
}

impl Transaction {
    pub fn new(version: u16, tx_type: u16, lock_time: u32) -> Self {
        Self {
            data_hash: TxHash::ZERO,
            version,
            tx_type,
            lock_time,
            extra_payload: Vec::new(),
            timestamp: Timestamp::now(),
            order: 0,
            block_hash: None,
            is_mine: false,
            is_outgoing: false,
            status: TransactionStatus::New,
            conflicting_tx_hash: None,
        }
    }

    pub fn has_extra_payload(&self) -> bool {
        self.version >= 3 && self.tx_type != TX_TYPE_CLASSIC
    }

    pub fn is_confirmed(&self) -> bool {
        self.block_hash.is_some()
    }

    /// Marks ownership. Never clears a previously set flag.
    pub fn mark_mine(&mut self, is_outgoing: bool) {
        self.is_mine = true;
        self.is_outgoing |= is_outgoing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_mine_is_monotone() {
        let mut tx = Transaction::new(1, 0, 0);
        tx.mark_mine(true);
        tx.mark_mine(false);
        assert!(tx.is_mine);
        assert!(tx.is_outgoing);
    }

    #[test]
    fn extra_payload_requires_version_three_and_type() {
        assert!(!Transaction::new(2, TX_TYPE_COINBASE, 0).has_extra_payload());
        assert!(!Transaction::new(3, TX_TYPE_CLASSIC, 0).has_extra_payload());
        assert!(Transaction::new(3, TX_TYPE_COINBASE, 0).has_extra_payload());
    }
}
