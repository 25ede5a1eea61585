//! # Domain Invariants
//!
//! Range and proof rules checked on every submission.

use super::errors::LedgerError;
use super::value_objects::StateUpdateProof;
use shared_types::Height;

/// Invariant: contiguity.
///
/// The first update of a chain may start anywhere from height 1; every later
/// one starts right after its predecessor. `start <= end` always.
pub fn invariant_contiguous(
    previous_end: Option<Height>,
    start: Height,
    end: Height,
) -> Result<(), LedgerError> {
    let (expected_start, continues) = match previous_end {
        Some(prev) => match prev.checked_add(1) {
            Some(next) => (next, start == next),
            // Nothing can follow an update ending at the last height.
            None => (prev, false),
        },
        None => (1, start >= 1),
    };
    if !continues || start > end {
        return Err(LedgerError::NonContiguousRange {
            start,
            end,
            expected_start,
        });
    }
    Ok(())
}

/// Invariant: the proof holds exactly one descriptor per covered height, in
/// ascending order.
pub fn invariant_proof_covers_range(
    proof: &StateUpdateProof,
    start: Height,
    end: Height,
) -> Result<(), LedgerError> {
    let expected = end.saturating_sub(start) + 1;
    if proof.block_descriptors.len() as u64 != expected {
        return Err(LedgerError::InvalidProof(format!(
            "expected {} block descriptors, got {}",
            expected,
            proof.block_descriptors.len()
        )));
    }
    for (descriptor, height) in proof.block_descriptors.iter().zip(start..=end) {
        if descriptor.height != height {
            return Err(LedgerError::InvalidProof(format!(
                "descriptor for height {} found at position of height {}",
                descriptor.height, height
            )));
        }
    }
    Ok(())
}
