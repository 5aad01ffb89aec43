//! Testnet minimum-difficulty rule.
//!
//! When a testnet block arrives long after its parent the difficulty is
//! relaxed: past `2 * target_timespan` it resets to the network maximum,
//! otherwise the parent target is multiplied by ten.

use primitive_types::U256;

use dashkit_types::{Block, PowParams};

use crate::compact::{compact_to_u256, u256_to_compact};
use crate::validator::BlockValidator;
use crate::ValidationError;

const SLOW_BLOCK_FACTOR: u32 = 4;
const TARGET_RELAX_FACTOR: u64 = 10;

pub struct DarkGravityWaveTestNetValidator {
    params: PowParams,
}

impl DarkGravityWaveTestNetValidator {
    pub fn new(params: PowParams) -> Self {
        Self { params }
    }

    fn expected_bits(&self, block: &Block, previous_block: &Block) -> Result<u32, ValidationError> {
        let gap = u64::from(block.timestamp()) - u64::from(previous_block.timestamp());
        if gap > 2 * u64::from(self.params.target_timespan) {
            return Ok(self.params.max_target_bits);
        }

        let max_target = compact_to_u256(self.params.max_target_bits)?;
        let relaxed = compact_to_u256(previous_block.bits())?
            .saturating_mul(U256::from(TARGET_RELAX_FACTOR))
            .min(max_target);
        Ok(u256_to_compact(relaxed))
    }
}

impl BlockValidator for DarkGravityWaveTestNetValidator {
    fn is_block_validatable(&self, block: &Block, previous_block: &Block) -> bool {
        let threshold = u64::from(previous_block.timestamp())
            + u64::from(SLOW_BLOCK_FACTOR * self.params.target_spacing);
        block.height >= self.params.pow_dgw_height && u64::from(block.timestamp()) > threshold
    }

    fn validate(&self, block: &Block, previous_block: &Block) -> Result<(), ValidationError> {
        if !self.is_block_validatable(block, previous_block) {
            return Ok(());
        }
        let expected = self.expected_bits(block, previous_block)?;
        if expected != block.bits() {
            tracing::warn!(
                block = %block.hash(),
                height = block.height,
                "testnet minimum difficulty mismatch"
            );
            return Err(ValidationError::InvalidDifficulty {
                expected,
                actual: block.bits(),
            });
        }
        Ok(())
    }
}
