//! Block difficulty validation for Dash headers.
//!
//! - [`compact`]: the `nBits` compact target encoding
//! - [`ProofOfWorkValidator`]: header hash against its declared target
//! - [`DarkGravityWaveValidator`]: mainnet 24-block retargeting
//! - [`DarkGravityWaveTestNetValidator`]: testnet minimum-difficulty reset
//! - [`BlockValidatorChain`] / [`BlockValidatorSet`]: composition

pub mod block_helper;
pub mod compact;
pub mod dark_gravity_wave;
pub mod dark_gravity_wave_testnet;
pub mod error;
pub mod proof_of_work;
pub mod validator;

pub use block_helper::BlockHelper;
pub use dark_gravity_wave::DarkGravityWaveValidator;
pub use dark_gravity_wave_testnet::DarkGravityWaveTestNetValidator;
pub use error::ValidationError;
pub use proof_of_work::ProofOfWorkValidator;
pub use validator::{network_validator, BlockValidator, BlockValidatorChain, BlockValidatorSet};
