use dashkit_store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid difficulty: expected bits {expected:#010x}, block has {actual:#010x}")]
    InvalidDifficulty { expected: u32, actual: u32 },

    #[error("header hash exceeds its target")]
    InvalidProofOfWork,

    #[error("compact target {0:#010x} is negative or overflows")]
    InvalidCompact(u32),

    #[error("ancestor block missing from storage")]
    NoPreviousBlock,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
