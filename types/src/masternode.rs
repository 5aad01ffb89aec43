//! Simplified masternode list entry.

use serde::{Deserialize, Serialize};

use crate::{BlockHash, TxHash};

/// Masternode type carried by entries with `n_version >= 2`.
pub const MASTERNODE_TYPE_REGULAR: u16 = 0;
/// High-performance (Evo) masternode; carries the platform fields.
pub const MASTERNODE_TYPE_HPMN: u16 = 1;

/// One entry of the deterministic masternode list.
///
/// The registry identity is [`Masternode::identity`] (`pro_reg_tx_hash`); all other
/// fields are payload and are replaced wholesale when a newer diff carries the
/// same identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Masternode {
    pub n_version: u16,
    pub pro_reg_tx_hash: TxHash,
    pub confirmed_hash: BlockHash,
    /// `SHA256(pro_reg_tx_hash || confirmed_hash)`, used for deterministic ranking.
    pub confirmed_hash_with_pro_reg_tx_hash: [u8; 32],
    /// IPv6 (or IPv4-mapped) address, 16 bytes.
    pub ip_address: [u8; 16],
    pub port: u16,
    /// 48-byte BLS operator public key.
    pub pub_key_operator: Vec<u8>,
    pub key_id_voting: [u8; 20],
    pub is_valid: bool,
    pub masternode_type: Option<u16>,
    pub platform_http_port: Option<u16>,
    pub platform_node_id: Option<[u8; 20]>,
}

impl Masternode {
    pub fn identity(&self) -> TxHash {
        self.pro_reg_tx_hash
    }

    pub fn is_hpmn(&self) -> bool {
        self.masternode_type == Some(MASTERNODE_TYPE_HPMN)
    }
}
