//src/extract.rs

//! Slicing feature sequences out of the genome.
//!
//! Known limitation: the strand of a feature is not taken into account.
//! Minus-strand features come out in forward (top-strand) orientation and are
//! NOT reverse-complemented.

use crate::error::ExtractError;
use crate::types::Location;

/// Returns `sequence[start..end]` for a feature on `locus`.
/// Bounds that fall outside the sequence are reported instead of truncated.
pub fn extract_sequence<'s>(
    sequence: &'s [u8],
    location: &Location,
    locus: &str,
) -> Result<&'s [u8], ExtractError> {
    let Location { start, end, .. } = *location;
    if start > end || end > sequence.len() {
        return Err(ExtractError::LocationOutOfBounds {
            locus: locus.to_string(),
            start,
            end,
            len: sequence.len(),
        });
    }
    Ok(&sequence[start..end])
}
