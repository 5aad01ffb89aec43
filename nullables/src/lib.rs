//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (clock, peers, storage) are abstracted behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod network;
pub mod store;

pub use clock::NullClock;
pub use network::{NullInitialBlockDownload, NullPeer};
pub use store::{NullStore, StoreFault};
