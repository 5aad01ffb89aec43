//! Dash transaction model.
//!
//! A stored transaction is split the way the wallet database keeps it:
//! - [`Transaction`]: the header row (hash, version, status, block link,
//!   ownership flags, conflict marker)
//! - [`Input`] and [`Output`]: one row per input and output, keyed by the
//!   owning transaction hash
//! - [`FullTransaction`]: header plus its inputs and outputs
//! - [`InvalidTransaction`]: a transaction moved out of the active set,
//!   carrying a JSON snapshot of its user-facing info
//!
//! [`serialize`] implements the consensus wire format, including the Dash
//! special-transaction `type` field and extra payload.

pub mod error;
pub mod full_transaction;
pub mod input;
pub mod invalid;
pub mod ordering;
pub mod output;
pub mod script;
pub mod serialize;
pub mod transaction;

pub use error::TransactionError;
pub use full_transaction::FullTransaction;
pub use input::{Input, Outpoint};
pub use invalid::InvalidTransaction;
pub use ordering::in_topological_order;
pub use output::Output;
pub use script::ScriptType;
pub use transaction::{Transaction, TransactionStatus, TX_TYPE_CLASSIC, TX_TYPE_COINBASE};
