//! Shared utilities for the DashKit workspace.

pub mod bytes;
pub mod logging;
pub mod stats;

pub use bytes::{ByteReader, ByteWriter, ReadError};
pub use logging::{init_logging, LogFormat};
pub use stats::StatsCounter;
