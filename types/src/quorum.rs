//! LLMQ final commitment entries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BlockHash, TypesError};

/// Long-living masternode quorum types relevant to an SPV client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum QuorumType {
    Llmq50_60 = 1,
    Llmq400_60 = 2,
    Llmq400_85 = 3,
    Llmq100_67 = 4,
    Llmq60_75 = 5,
    Llmq25_67 = 6,
    LlmqTest = 100,
    LlmqDevnet = 101,
    LlmqTestV17 = 102,
    LlmqTestDip0024 = 103,
    LlmqTestInstantSend = 104,
}

impl QuorumType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for QuorumType {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Llmq50_60,
            2 => Self::Llmq400_60,
            3 => Self::Llmq400_85,
            4 => Self::Llmq100_67,
            5 => Self::Llmq60_75,
            6 => Self::Llmq25_67,
            100 => Self::LlmqTest,
            101 => Self::LlmqDevnet,
            102 => Self::LlmqTestV17,
            103 => Self::LlmqTestDip0024,
            104 => Self::LlmqTestInstantSend,
            other => return Err(TypesError::UnknownQuorumType(other)),
        })
    }
}

/// Registry identity of a quorum: `(type, quorum_hash)`, ordered type first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuorumId {
    pub quorum_type: u8,
    pub quorum_hash: BlockHash,
}

impl QuorumId {
    pub fn new(quorum_type: u8, quorum_hash: BlockHash) -> Self {
        Self {
            quorum_type,
            quorum_hash,
        }
    }
}

impl fmt::Debug for QuorumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuorumId({}, {:?})", self.quorum_type, self.quorum_hash)
    }
}

/// A final quorum commitment as relayed in `mnlistdiff`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quorum {
    pub version: u16,
    pub quorum_type: u8,
    pub quorum_hash: BlockHash,
    /// Present for rotated (indexed) commitments, versions 2 and 4.
    pub quorum_index: Option<u16>,
    pub signers_count: u64,
    pub signers: Vec<u8>,
    pub valid_members_count: u64,
    pub valid_members: Vec<u8>,
    /// 48-byte BLS threshold public key.
    pub quorum_public_key: Vec<u8>,
    pub quorum_vvec_hash: [u8; 32],
    /// 96-byte recovered threshold signature.
    pub quorum_sig: Vec<u8>,
    /// 96-byte aggregated members signature.
    pub members_sig: Vec<u8>,
    /// Double SHA-256 of the serialized commitment; the merkle leaf.
    pub data_hash: [u8; 32],
}

impl Quorum {
    pub fn identity(&self) -> QuorumId {
        QuorumId::new(self.quorum_type, self.quorum_hash)
    }

    /// Whether the commitment layout carries `quorum_index`.
    pub fn is_indexed_version(version: u16) -> bool {
        version == 2 || version == 4
    }
}
