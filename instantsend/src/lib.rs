//! InstantSend for DashKit.
//!
//! An `islock` binds a transaction to the outpoints it spends with a
//! threshold signature from a long-living masternode quorum. A valid lock
//! makes the transaction instant-final.
//!
//! - [`InstantSendLockValidator`]: quorum selection and signature check
//! - [`InstantSendLockManager`]: locks waiting for their transaction
//! - [`InstantTransactionManager`]: instant state, input coverage and
//!   first-valid-wins across conflicting spends
//! - [`InstantSendLockHandler`]: entry point for relayed locks and newly
//!   inserted transactions

pub mod error;
pub mod handler;
pub mod lock_manager;
pub mod state;
pub mod transaction_manager;
pub mod validator;

pub use error::InstantSendError;
pub use handler::{InstantSendLockHandler, LockOutcome};
pub use lock_manager::InstantSendLockManager;
pub use state::InstantTransactionState;
pub use transaction_manager::InstantTransactionManager;
pub use validator::{sign_id, InstantSendLockValidator};
