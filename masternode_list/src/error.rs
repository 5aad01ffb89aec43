use std::fmt;

use dashkit_crypto::MerkleError;
use dashkit_store::StoreError;
use dashkit_types::BlockHash;
use thiserror::Error;

/// Which coinbase commitment failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentKind {
    MasternodeList,
    Quorums,
}

impl fmt::Display for CommitmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MasternodeList => f.write_str("masternode list"),
            Self::Quorums => f.write_str("quorum list"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MasternodeListError {
    #[error("stale diff: local checkpoint {expected}, diff base {actual}")]
    StaleDiff {
        expected: BlockHash,
        actual: BlockHash,
    },

    #[error("{kind} merkle root does not match coinbase commitment")]
    CommitmentMismatch { kind: CommitmentKind },

    #[error("no stored header for diff block {0}")]
    NoMerkleBlockHeader(BlockHash),

    #[error("coinbase transaction is not proven in the block")]
    CoinbaseNotInBlock,

    #[error("merkle proof error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
