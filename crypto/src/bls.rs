//! BLS12-381 signature verification for quorum-signed messages.
//!
//! Quorum public keys live on G1 (48 bytes compressed) and threshold
//! signatures on G2 (96 bytes compressed), i.e. the `min_pk` variant.

use blst::min_pk::{PublicKey, Signature};

pub const BLS_PUBLIC_KEY_SIZE: usize = 48;
pub const BLS_SIGNATURE_SIZE: usize = 96;

/// Basic-scheme domain separation tag used by Dash (BLS v19+ "basic" scheme).
pub const BLS_BASIC_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// Verifies a signature over a 32-byte message hash.
///
/// Implemented by [`BlsVerifier`] in production; tests substitute fakes.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, public_key: &[u8], message: &[u8; 32], signature: &[u8]) -> bool;
}

/// `blst`-backed verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlsVerifier;

impl SignatureVerifier for BlsVerifier {
    fn verify(&self, public_key: &[u8], message: &[u8; 32], signature: &[u8]) -> bool {
        let Ok(pk) = PublicKey::from_bytes(public_key) else {
            tracing::debug!("quorum public key failed to deserialize");
            return false;
        };
        let Ok(sig) = Signature::from_bytes(signature) else {
            tracing::debug!("signature failed to deserialize");
            return false;
        };
        sig.verify(true, message, BLS_BASIC_DST, &[], &pk, true) == blst::BLST_ERROR::BLST_SUCCESS
    }
}
