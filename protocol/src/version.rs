//! Protocol version management.
//!
//! The `mnlistdiff` layout moved several times; each constant names the
//! first protocol version carrying the change.

/// Highest protocol version this crate speaks.
pub const PROTOCOL_VERSION: i32 = 70230;

/// Oldest protocol version whose messages can be decoded.
pub const MIN_PROTOCOL_VERSION: i32 = 70214;

/// `mnlistdiff` carries `nVersion` after the coinbase transaction.
pub const BLS_SCHEME_PROTO_VERSION: i32 = 70225;

/// Masternode list entries are prefixed with their own `nVersion`.
pub const SMNLE_VERSIONED_PROTO_VERSION: i32 = 70228;

/// `nVersion` moves to the front of `mnlistdiff`.
pub const MNLISTDIFF_VERSION_ORDER: i32 = 70229;

/// `mnlistdiff` ends with per-quorum chain-lock signatures.
pub const MNLISTDIFF_CHAINLOCKS_PROTO_VERSION: i32 = 70230;

/// Check if a peer's protocol version is compatible.
pub fn is_compatible(peer_version: i32) -> bool {
    (MIN_PROTOCOL_VERSION..=PROTOCOL_VERSION).contains(&peer_version)
}
