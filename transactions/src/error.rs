use dashkit_utils::ReadError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("malformed transaction: {0}")]
    Decode(#[from] ReadError),

    #[error("transaction has no inputs")]
    NoInputs,

    #[error("output value {0} is negative")]
    NegativeValue(i64),
}
