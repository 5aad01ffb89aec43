use primitive_types::U256;

use dashkit_types::Block;

use crate::compact::compact_to_u256;
use crate::validator::BlockValidator;
use crate::ValidationError;

/// The header hash, read as a little-endian integer, must not exceed the
/// target the header declares, and that target must not exceed the
/// network maximum.
pub struct ProofOfWorkValidator {
    max_target_bits: u32,
}

impl ProofOfWorkValidator {
    pub fn new(max_target_bits: u32) -> Self {
        Self { max_target_bits }
    }
}

impl BlockValidator for ProofOfWorkValidator {
    fn is_block_validatable(&self, _block: &Block, _previous_block: &Block) -> bool {
        true
    }

    fn validate(&self, block: &Block, _previous_block: &Block) -> Result<(), ValidationError> {
        let target = compact_to_u256(block.bits())?;
        let max_target = compact_to_u256(self.max_target_bits)?;
        if target.is_zero() || target > max_target {
            return Err(ValidationError::InvalidProofOfWork);
        }

        let hash = U256::from_little_endian(block.hash().as_bytes());
        if hash > target {
            tracing::warn!(block = %block.hash(), height = block.height, "proof of work above target");
            return Err(ValidationError::InvalidProofOfWork);
        }
        Ok(())
    }
}
