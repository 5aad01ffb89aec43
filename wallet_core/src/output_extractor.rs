use std::sync::Arc;

use dashkit_transactions::FullTransaction;

use crate::PublicKeyManager;

/// Tags outputs paying to wallet keys and marks their transaction as mine.
pub struct OutputExtractor {
    keys: Arc<dyn PublicKeyManager>,
}

impl OutputExtractor {
    pub fn new(keys: Arc<dyn PublicKeyManager>) -> Self {
        Self { keys }
    }

    pub fn extract(&self, transaction: &mut FullTransaction) {
        let mut found = false;
        for output in &mut transaction.outputs {
            let Some(key_hash) = &output.key_hash else {
                continue;
            };
            if let Some(path) = self.keys.public_key_path(key_hash) {
                output.public_key_path = Some(path);
                found = true;
            }
        }
        if found {
            transaction.header.mark_mine(false);
        }
    }
}
