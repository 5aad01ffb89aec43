//! Typed Dash P2P messages.
//!
//! Only the messages the Dash extension layer consumes or produces are
//! modelled here; the generic Bitcoin messages belong to the underlying sync
//! engine. Wire encoding lives in `dashkit-protocol`.

use dashkit_transactions::{FullTransaction, Outpoint};
use dashkit_types::{BlockHash, Masternode, Quorum, QuorumId, TxHash};
use serde::{Deserialize, Serialize};

/// P2P command strings.
pub mod command {
    pub const GET_MN_LIST_DIFF: &str = "getmnlistd";
    pub const MN_LIST_DIFF: &str = "mnlistdiff";
    pub const ISLOCK: &str = "islock";
    pub const TRANSACTION: &str = "tx";
    pub const TRANSACTION_LOCK_REQUEST: &str = "ix";
}

/// Request for the masternode list transition `base_block_hash -> block_hash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMasternodeListDiffMessage {
    pub base_block_hash: BlockHash,
    pub block_hash: BlockHash,
}

/// The coinbase transaction of a block together with its decoded DIP-0004
/// payload. Optional fields are present exactly when `cb_version` allows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseTransaction {
    pub transaction: FullTransaction,
    pub cb_version: u16,
    pub height: u32,
    pub merkle_root_mn_list: [u8; 32],
    /// `cb_version >= 2`.
    pub merkle_root_quorums: Option<[u8; 32]>,
    /// `cb_version >= 3`.
    pub best_cl_height_diff: Option<u32>,
    /// `cb_version >= 3`; 96-byte BLS signature.
    pub best_cl_signature: Option<Vec<u8>>,
    /// `cb_version >= 3`; duffs.
    pub credit_pool_balance: Option<i64>,
}

impl CoinbaseTransaction {
    pub fn hash(&self) -> TxHash {
        self.transaction.hash()
    }
}

/// Chain-lock signature over a group of quorums (protocol 70230+).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumChainLockSignature {
    pub signature: Vec<u8>,
    pub quorum_indexes: Vec<u16>,
}

/// Authenticated masternode and quorum list delta.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasternodeListDiffMessage {
    pub n_version: u16,
    pub base_block_hash: BlockHash,
    pub block_hash: BlockHash,
    /// Partial merkle tree proving `cb_tx` is in `block_hash`.
    pub total_transactions: u32,
    pub merkle_hashes: Vec<[u8; 32]>,
    pub merkle_flags: Vec<u8>,
    pub cb_tx: CoinbaseTransaction,
    pub deleted_mns: Vec<TxHash>,
    pub mn_list: Vec<Masternode>,
    pub deleted_quorums: Vec<QuorumId>,
    pub quorum_list: Vec<Quorum>,
    pub quorums_cl_sigs: Vec<QuorumChainLockSignature>,
}

/// An InstantSend lock: the quorum signature binding `tx_hash` to the
/// outpoints it spends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ISLockMessage {
    pub inputs: Vec<Outpoint>,
    pub tx_hash: TxHash,
    /// 96-byte recovered threshold signature.
    pub signature: Vec<u8>,
    /// Double SHA-256 of the message payload.
    pub hash: [u8; 32],
    /// `SHA256d("islock" || inputs)`, the signing request id.
    pub request_id: [u8; 32],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    pub transaction: FullTransaction,
}

/// Legacy InstantSend lock request; carries a plain transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLockRequestMessage {
    pub transaction: FullTransaction,
}

/// Every message the extension layer decodes or encodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashMessage {
    GetMasternodeListDiff(GetMasternodeListDiffMessage),
    MasternodeListDiff(Box<MasternodeListDiffMessage>),
    ISLock(ISLockMessage),
    Transaction(TransactionMessage),
    TransactionLockRequest(TransactionLockRequestMessage),
}

impl DashMessage {
    pub fn command(&self) -> &'static str {
        match self {
            Self::GetMasternodeListDiff(_) => command::GET_MN_LIST_DIFF,
            Self::MasternodeListDiff(_) => command::MN_LIST_DIFF,
            Self::ISLock(_) => command::ISLOCK,
            Self::Transaction(_) => command::TRANSACTION,
            Self::TransactionLockRequest(_) => command::TRANSACTION_LOCK_REQUEST,
        }
    }
}
