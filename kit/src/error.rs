use thiserror::Error;

#[derive(Debug, Error)]
pub enum KitError {
    #[error("store error: {0}")]
    Store(#[from] dashkit_store::StoreError),

    #[error("protocol error: {0}")]
    Protocol(#[from] dashkit_protocol::ProtocolError),

    #[error("block validation error: {0}")]
    Validation(#[from] dashkit_pow::ValidationError),

    #[error("masternode list error: {0}")]
    MasternodeList(#[from] dashkit_masternode_list::MasternodeListError),

    #[error("wallet error: {0}")]
    Wallet(#[from] dashkit_wallet_core::WalletError),

    #[error("instantsend error: {0}")]
    InstantSend(#[from] dashkit_instantsend::InstantSendError),

    #[error("config error: {0}")]
    Config(String),

    #[error("kit not started")]
    NotStarted,

    #[error("masternode list syncer stopped")]
    SyncerStopped,
}

impl KitError {
    /// The wallet must rebuild and resend its bloom filter.
    pub fn is_bloom_filter_expired(&self) -> bool {
        matches!(
            self,
            Self::Wallet(dashkit_wallet_core::WalletError::BloomFilterExpired)
        )
    }
}
