use thiserror::Error;

/// Failures of merkle root reconstruction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("merkle root mismatch")]
    MerkleMismatch,

    #[error("merkle block declares no transactions")]
    NoTransactions,

    #[error("merkle block declares {0} transactions, more than a block can hold")]
    TooManyTransactions(u32),

    #[error("more hashes supplied than transactions")]
    TooManyHashes,

    #[error("ran out of flag bits while traversing the tree")]
    FlagsExhausted,

    #[error("ran out of hashes while traversing the tree")]
    HashesExhausted,

    #[error("not all supplied hashes were consumed")]
    UnconsumedHashes,

    #[error("not all flag bytes were consumed")]
    UnconsumedFlags,

    #[error("identical sibling hashes in partial merkle tree")]
    DuplicateHashes,
}
