//! Validator trait and its two composition strategies.

use std::sync::Arc;

use dashkit_store::BlockStore;
use dashkit_types::{Block, NetworkId};

use crate::{
    BlockHelper, DarkGravityWaveTestNetValidator, DarkGravityWaveValidator, ProofOfWorkValidator,
    ValidationError,
};

/// A single header rule checked against the block's parent.
pub trait BlockValidator: Send + Sync {
    /// Whether this rule applies to `block` at all. Not applicable is a
    /// skip, never a failure.
    fn is_block_validatable(&self, block: &Block, previous_block: &Block) -> bool;

    fn validate(&self, block: &Block, previous_block: &Block) -> Result<(), ValidationError>;
}

/// Runs the first applicable validator only.
#[derive(Default)]
pub struct BlockValidatorChain {
    validators: Vec<Box<dyn BlockValidator>>,
}

impl BlockValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl BlockValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl BlockValidator for BlockValidatorChain {
    fn is_block_validatable(&self, block: &Block, previous_block: &Block) -> bool {
        self.validators
            .iter()
            .any(|v| v.is_block_validatable(block, previous_block))
    }

    fn validate(&self, block: &Block, previous_block: &Block) -> Result<(), ValidationError> {
        match self
            .validators
            .iter()
            .find(|v| v.is_block_validatable(block, previous_block))
        {
            Some(validator) => validator.validate(block, previous_block),
            None => Ok(()),
        }
    }
}

/// Runs every applicable validator; the first error wins.
#[derive(Default)]
pub struct BlockValidatorSet {
    validators: Vec<Box<dyn BlockValidator>>,
}

impl BlockValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl BlockValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl BlockValidator for BlockValidatorSet {
    fn is_block_validatable(&self, block: &Block, previous_block: &Block) -> bool {
        self.validators
            .iter()
            .any(|v| v.is_block_validatable(block, previous_block))
    }

    fn validate(&self, block: &Block, previous_block: &Block) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .filter(|v| v.is_block_validatable(block, previous_block))
            .try_for_each(|v| v.validate(block, previous_block))
    }
}

/// The header rules for `network`.
///
/// Mainnet checks proof of work plus DarkGravityWave. Testnet first tries
/// the minimum-difficulty reset and falls back to DarkGravityWave.
pub fn network_validator(
    network: NetworkId,
    store: Arc<dyn BlockStore + Send + Sync>,
    first_checkpoint_height: u32,
) -> BlockValidatorSet {
    let pow = network.params().pow;
    let helper = BlockHelper::new(store);
    let dgw = DarkGravityWaveValidator::new(helper, pow, first_checkpoint_height);

    let chain = match network {
        NetworkId::MainNet => BlockValidatorChain::new().with(dgw),
        NetworkId::TestNet => BlockValidatorChain::new()
            .with(DarkGravityWaveTestNetValidator::new(pow))
            .with(dgw),
    };

    BlockValidatorSet::new()
        .with(ProofOfWorkValidator::new(pow.max_target_bits))
        .with(chain)
}
