//! Wallet key lookup boundary.
//!
//! Key derivation lives in the wallet; the processor only asks whether a
//! key hash is the wallet's and whether the last match moved the gap limit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

pub trait PublicKeyManager: Send + Sync {
    /// Derivation path of the wallet key with this hash (or raw key for
    /// pay-to-pubkey outputs).
    fn public_key_path(&self, key_hash: &[u8]) -> Option<String>;

    /// Whether used keys have advanced past the gap limit since the last
    /// call, so the bloom filter must grow.
    fn gap_shifts(&self) -> bool;
}

/// A fixed set of watched key hashes.
#[derive(Default)]
pub struct WatchedKeys {
    paths: RwLock<HashMap<Vec<u8>, String>>,
    gap_shifted: AtomicBool,
}

impl WatchedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `key_hash`; flags a gap shift for the next [`PublicKeyManager::gap_shifts`].
    pub fn watch(&self, key_hash: &[u8], path: impl Into<String>) {
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key_hash.to_vec(), path.into());
        self.gap_shifted.store(true, Ordering::SeqCst);
    }
}

impl PublicKeyManager for WatchedKeys {
    fn public_key_path(&self, key_hash: &[u8]) -> Option<String> {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key_hash)
            .cloned()
    }

    fn gap_shifts(&self) -> bool {
        self.gap_shifted.swap(false, Ordering::SeqCst)
    }
}
