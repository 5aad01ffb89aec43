use dashkit_masternode_list::MasternodeListError;
use dashkit_store::StoreError;
use dashkit_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstantSendError {
    #[error("no quorum available to sign the lock")]
    QuorumNotFound,

    #[error("lock signature not valid")]
    SignatureNotValid,

    #[error("lock does not cover the inputs of {0}")]
    InputsNotCovered(TxHash),

    #[error("an input is already locked by instant transaction {0}")]
    ConflictingLock(TxHash),

    #[error("masternode list error: {0}")]
    MasternodeList(#[from] MasternodeListError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl InstantSendError {
    /// Failures caused by the lock itself rather than local state.
    pub fn is_untrusted_input(&self) -> bool {
        !matches!(self, Self::MasternodeList(_) | Self::Store(_))
    }
}
