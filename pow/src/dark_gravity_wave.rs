//! DarkGravityWave difficulty retargeting (mainnet rules).
//!
//! The expected target for a block is the weighted average of the targets
//! of the previous `height_interval` blocks, scaled by how long that window
//! actually took relative to `target_timespan`. The scaling factor is
//! clamped to `[1/3, 3]` and the result capped at the network maximum.

use primitive_types::{U256, U512};

use dashkit_types::{Block, PowParams};

use crate::compact::{compact_to_u256, u256_to_compact};
use crate::validator::BlockValidator;
use crate::{BlockHelper, ValidationError};

pub struct DarkGravityWaveValidator {
    helper: BlockHelper,
    params: PowParams,
    /// Height of the earliest stored header. Blocks whose window reaches
    /// below it are trusted, since their ancestors were never downloaded.
    first_checkpoint_height: u32,
}

impl DarkGravityWaveValidator {
    pub fn new(helper: BlockHelper, params: PowParams, first_checkpoint_height: u32) -> Self {
        Self {
            helper,
            params,
            first_checkpoint_height,
        }
    }

    /// Recompute the compact target `block` must carry, or `None` when the
    /// window reaches past the stored chain.
    pub fn expected_bits(&self, previous_block: &Block) -> Result<Option<u32>, ValidationError> {
        let max_target = compact_to_u256(self.params.max_target_bits)?;

        let mut oldest = previous_block.clone();
        let mut average = compact_to_u256(oldest.bits())?;
        for count in 2..=self.params.height_interval {
            let Some(ancestor) = self.helper.previous(&oldest, 1)? else {
                return Ok(None);
            };
            let target = compact_to_u256(ancestor.bits())?;
            let weighted = average.full_mul(U256::from(count)) + U512::from(target);
            average = narrow(weighted / U512::from(count + 1));
            oldest = ancestor;
        }

        let target_timespan = i64::from(self.params.target_timespan);
        let actual_timespan = (i64::from(previous_block.timestamp())
            - i64::from(oldest.timestamp()))
        .clamp(target_timespan / 3, target_timespan * 3);

        let scaled = average.full_mul(U256::from(actual_timespan as u64))
            / U512::from(target_timespan as u64);
        let new_target = narrow(scaled).min(max_target);

        Ok(Some(u256_to_compact(new_target)))
    }
}

fn narrow(value: U512) -> U256 {
    U256::try_from(value).unwrap_or(U256::MAX)
}

impl BlockValidator for DarkGravityWaveValidator {
    fn is_block_validatable(&self, block: &Block, _previous_block: &Block) -> bool {
        block.height >= self.params.pow_dgw_height
    }

    fn validate(&self, block: &Block, previous_block: &Block) -> Result<(), ValidationError> {
        let Some(expected) = self.expected_bits(previous_block)? else {
            if block.height <= self.first_checkpoint_height + self.params.height_interval {
                return Ok(());
            }
            return Err(ValidationError::NoPreviousBlock);
        };

        if expected != block.bits() {
            tracing::warn!(
                block = %block.hash(),
                height = block.height,
                expected = format_args!("{expected:#010x}"),
                actual = format_args!("{:#010x}", block.bits()),
                "difficulty mismatch"
            );
            return Err(ValidationError::InvalidDifficulty {
                expected,
                actual: block.bits(),
            });
        }
        Ok(())
    }
}
