use dashkit_transactions::TransactionError;
use dashkit_utils::ReadError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(i32),

    #[error("message too large: {size} > {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unexpected end of message: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("no parser registered for command {0:?}")]
    UnknownCommand(String),
}

impl From<ReadError> for ProtocolError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::UnexpectedEof { needed, remaining } => {
                Self::UnexpectedEof { needed, remaining }
            }
            other => Self::Malformed(other.to_string()),
        }
    }
}

impl From<TransactionError> for ProtocolError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Decode(read) => read.into(),
            other => Self::Malformed(other.to_string()),
        }
    }
}
