//! Wallet-side transaction processing for DashKit.
//!
//! - [`TransactionProcessor`]: ownership detection, relay/confirmation
//!   updates, conflict adjudication and descendant invalidation
//! - [`TransactionMediator`]: the accept-or-ignore rule for double spends
//! - [`OutputsCache`] / [`OutputExtractor`]: which outputs belong to the wallet
//! - [`ConfirmedUnspentOutputProvider`]: spendable outputs past the
//!   confirmation threshold
//! - [`EventBus`]: inserted / updated / invalidated notifications

pub mod error;
pub mod events;
pub mod irregular_output;
pub mod mediator;
pub mod output_extractor;
pub mod outputs_cache;
pub mod processor;
pub mod public_key;
pub mod transaction_info;
pub mod unspent_output_provider;

pub use error::WalletError;
pub use events::{EventBus, TransactionEvent};
pub use irregular_output::has_irregular_output;
pub use mediator::{ConflictResolution, TransactionMediator};
pub use output_extractor::OutputExtractor;
pub use outputs_cache::OutputsCache;
pub use processor::TransactionProcessor;
pub use public_key::{PublicKeyManager, WatchedKeys};
pub use transaction_info::{
    BaseTransactionInfoConverter, TransactionInfo, TransactionInfoConverter,
};
pub use unspent_output_provider::{ConfirmedUnspentOutputProvider, UtxoFilters};
