//! Chain parameters: wire constants and difficulty retargeting settings.

use crate::{NetworkId, QuorumType};

/// Blocks in the DarkGravityWave averaging window.
pub const DGW_HEIGHT_INTERVAL: u32 = 24;
/// Target time between blocks in seconds (2.5 minutes).
pub const DASH_TARGET_SPACING: u32 = 150;
/// Initial and maximum target, in compact form.
pub const DASH_MAX_TARGET_BITS: u32 = 0x1E0F_FFFF;

/// Difficulty retargeting parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowParams {
    /// Number of blocks averaged by DarkGravityWave.
    pub height_interval: u32,
    /// Seconds between blocks.
    pub target_spacing: u32,
    /// `height_interval * target_spacing`.
    pub target_timespan: u32,
    pub max_target_bits: u32,
    /// First height validated by DarkGravityWave.
    pub pow_dgw_height: u32,
}

impl PowParams {
    pub fn dash(pow_dgw_height: u32) -> Self {
        Self {
            height_interval: DGW_HEIGHT_INTERVAL,
            target_spacing: DASH_TARGET_SPACING,
            target_timespan: DGW_HEIGHT_INTERVAL * DASH_TARGET_SPACING,
            max_target_bits: DASH_MAX_TARGET_BITS,
            pow_dgw_height,
        }
    }
}

/// Per-network constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainParams {
    pub network: NetworkId,
    pub protocol_version: i32,
    pub magic: u32,
    pub port: u16,
    pub max_block_size: u32,
    pub pub_key_hash: u8,
    pub script_hash: u8,
    pub private_key: u8,
    pub coin_type: u32,
    /// Dust relay fee in duffs per kB (dash `policy.h`).
    pub dust_relay_tx_fee: u64,
    pub dns_seeds: &'static [&'static str],
    /// LLMQ type that signs InstantSend locks.
    pub instant_send_quorum_type: QuorumType,
    pub pow: PowParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_timespan_is_window_times_spacing() {
        let pow = PowParams::dash(0);
        assert_eq!(pow.target_timespan, 3600);
        assert_eq!(pow.max_target_bits, 0x1E0F_FFFF);
    }
}
