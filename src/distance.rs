//! Euclidean distance between profile vectors.
//!
//! Distances are plain (not squared): the clustering driver sums them into
//! its convergence signal, so the magnitudes must stay comparable across
//! passes.

use crate::error::{Error, Result};

/// Euclidean distance between two equal-length vectors.
///
/// Returns [`Error::DimensionMismatch`] when the lengths differ.
pub fn euclidean(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(euclidean_unchecked(a, b))
}

/// Hot-path variant for callers that have already validated dimensions.
#[inline]
pub(crate) fn euclidean_unchecked(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
