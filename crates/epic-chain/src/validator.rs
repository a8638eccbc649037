//! Block validation seam
//!
//! Signature, proof-of-work and double-spend checks live outside this crate.
//! The ledger calls a [`BlockValidator`] before it touches any state; the
//! default [`AcceptAll`] admits every structurally well-formed block.

use crate::error::ValidationError;
use crate::view::ChainView;
use epic_types::Block;

/// Semantic check run on a candidate block before it is appended
pub trait BlockValidator: Send + Sync {
    /// Accept or reject `candidate` given the current committed state
    fn validate(&self, candidate: &Block, chain: &ChainView<'_>) -> Result<(), ValidationError>;
}

/// Accepts every block
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl BlockValidator for AcceptAll {
    fn validate(&self, _candidate: &Block, _chain: &ChainView<'_>) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Requires the block to claim the next height and reference the current tip
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkageValidator;

impl BlockValidator for LinkageValidator {
    fn validate(&self, candidate: &Block, chain: &ChainView<'_>) -> Result<(), ValidationError> {
        let expected = chain.next_height();
        if candidate.height != expected {
            return Err(ValidationError::HeightMismatch {
                expected,
                got: candidate.height,
            });
        }
        let tip = chain.tip();
        if candidate.previous_hash != tip.hash {
            return Err(ValidationError::PreviousHashMismatch {
                expected: tip.hash.clone(),
                got: candidate.previous_hash.clone(),
            });
        }
        Ok(())
    }
}

impl<F> BlockValidator for F
where
    F: Fn(&Block, &ChainView<'_>) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, candidate: &Block, chain: &ChainView<'_>) -> Result<(), ValidationError> {
        self(candidate, chain)
    }
}
