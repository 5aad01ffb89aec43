//! Cryptographic primitives for DashKit.
//!
//! - **SHA-256 / double SHA-256** for transaction, merkle and quorum hashing
//! - **Merkle engine**: full roots and BIP37 partial merkle branches
//! - **BLS12-381** signature verification for quorum-signed messages

pub mod bls;
pub mod error;
pub mod hash;
pub mod merkle;

pub use bls::{BlsVerifier, SignatureVerifier, BLS_PUBLIC_KEY_SIZE, BLS_SIGNATURE_SIZE};
pub use error::MerkleError;
pub use hash::{double_sha256, double_sha256_multi, hash_transaction, sha256, sha256_multi};
pub use merkle::{merkle_root, MerkleBranch, PartialMerkleTree};
