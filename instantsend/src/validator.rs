//! Quorum signature check for `islock` messages.

use std::sync::Arc;

use dashkit_crypto::{double_sha256_multi, SignatureVerifier};
use dashkit_masternode_list::QuorumListManager;
use dashkit_messages::ISLockMessage;
use dashkit_types::{Quorum, QuorumType};
use tracing::debug;

use crate::InstantSendError;

/// `SHA256d(type || quorum_hash || request_id || tx_hash)`, the digest the
/// quorum signs.
pub fn sign_id(quorum: &Quorum, lock: &ISLockMessage) -> [u8; 32] {
    double_sha256_multi(&[
        &[quorum.quorum_type],
        quorum.quorum_hash.as_bytes(),
        &lock.request_id,
        lock.tx_hash.as_bytes(),
    ])
}

pub struct InstantSendLockValidator {
    quorums: Arc<QuorumListManager>,
    verifier: Arc<dyn SignatureVerifier>,
    quorum_type: QuorumType,
}

impl InstantSendLockValidator {
    pub fn new(
        quorums: Arc<QuorumListManager>,
        verifier: Arc<dyn SignatureVerifier>,
        quorum_type: QuorumType,
    ) -> Self {
        Self {
            quorums,
            verifier,
            quorum_type,
        }
    }

    pub fn validate(&self, lock: &ISLockMessage) -> Result<(), InstantSendError> {
        let quorum = self
            .quorums
            .quorum(&lock.request_id, self.quorum_type)?
            .ok_or(InstantSendError::QuorumNotFound)?;

        let digest = sign_id(&quorum, lock);
        if !self
            .verifier
            .verify(&quorum.quorum_public_key, &digest, &lock.signature)
        {
            debug!(tx_hash = %lock.tx_hash, quorum = ?quorum.identity(), "islock signature rejected");
            return Err(InstantSendError::SignatureNotValid);
        }
        Ok(())
    }
}
