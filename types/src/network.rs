//! Network identifier.

use serde::{Deserialize, Serialize};

use crate::params::{ChainParams, PowParams};
use crate::QuorumType;

/// Identifies which Dash network the kit is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// The production network.
    MainNet,
    /// The public test network.
    TestNet,
}

impl NetworkId {
    /// Default P2P port for this network.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::MainNet => 9999,
            Self::TestNet => 19999,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainNet => "mainnet",
            Self::TestNet => "testnet",
        }
    }

    /// Consensus and wire constants for this network.
    pub fn params(&self) -> ChainParams {
        match self {
            Self::MainNet => ChainParams {
                network: *self,
                protocol_version: 70228,
                magic: 0xBF0C_6BBD,
                port: self.default_port(),
                max_block_size: 2_000_000_000,
                pub_key_hash: 0x4C,
                script_hash: 0x10,
                private_key: 0x80,
                coin_type: 5,
                dust_relay_tx_fee: 3000,
                dns_seeds: &[
                    "dnsseed.dash.org",
                    "x5.dnsseed.dashdot.io",
                    "dnsseed.masternode.io",
                ],
                instant_send_quorum_type: QuorumType::Llmq50_60,
                pow: PowParams::dash(68_589),
            },
            Self::TestNet => ChainParams {
                network: *self,
                protocol_version: 70214,
                magic: 0xCEE2_CAFF,
                port: self.default_port(),
                max_block_size: 1_000_000_000,
                pub_key_hash: 0x8C,
                script_hash: 0x13,
                private_key: 0x80,
                coin_type: 1,
                dust_relay_tx_fee: 1000,
                dns_seeds: &["testnet-seed.dashdot.io", "test.dnsseed.masternode.io"],
                instant_send_quorum_type: QuorumType::Llmq50_60,
                pow: PowParams::dash(4002),
            },
        }
    }
}
