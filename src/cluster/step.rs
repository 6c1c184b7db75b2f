//! Single assignment and update passes over a set of centers.
//!
//! These are the two primitives the convergence driver alternates between.
//! They are exposed on their own so callers can drive partial passes, for
//! example to recompute labels against final centers.

use crate::distance;
use crate::error::{Error, Result};

/// Outcome of one assignment pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Sum of each profile's distance to its nearest center.
    ///
    /// This is a convergence signal, not a clustering quality score; it is
    /// summed in `f64` so long inputs do not lose precision.
    pub total_error: f64,
    /// Nearest-center index per profile, in input order.
    pub labels: Vec<usize>,
}

/// Labels every profile with its nearest center.
///
/// Ties resolve to the lowest center index. Errors when either slice is
/// empty or any vector disagrees with the centers' dimensionality.
pub fn assign(centers: &[Vec<f32>], profiles: &[Vec<f32>]) -> Result<Assignment> {
    if centers.is_empty() || profiles.is_empty() {
        return Err(Error::EmptyInput);
    }
    let dim = centers[0].len();
    for c in centers {
        check_dim(dim, c)?;
    }
    for p in profiles {
        check_dim(dim, p)?;
    }

    let mut labels = Vec::with_capacity(profiles.len());
    let mut total_error = 0.0f64;
    for profile in profiles {
        let mut best = f32::INFINITY;
        let mut best_idx = 0;
        for (idx, center) in centers.iter().enumerate() {
            let d = distance::euclidean_unchecked(profile, center);
            // Strict `<` keeps the lowest index on ties.
            if d < best {
                best = d;
                best_idx = idx;
            }
        }
        total_error += f64::from(best);
        labels.push(best_idx);
    }
    Ok(Assignment { total_error, labels })
}

/// Recomputes `k` centers as the per-dimension mean of each label group.
///
/// A cluster that no profile points at comes back as `None`; the caller
/// decides whether to reseed or fail. Means are never synthesized from an
/// empty group.
pub fn update(labels: &[usize], profiles: &[Vec<f32>], k: usize) -> Result<Vec<Option<Vec<f32>>>> {
    if profiles.is_empty() {
        return Err(Error::EmptyInput);
    }
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "must be at least 1",
        });
    }
    if labels.len() != profiles.len() {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "must have one entry per profile",
        });
    }
    let dim = profiles[0].len();
    for p in profiles {
        check_dim(dim, p)?;
    }
    for &label in labels {
        if label >= k {
            return Err(Error::InvalidParameter {
                name: "labels",
                message: "cluster index out of range",
            });
        }
    }

    let mut sums = vec![vec![0.0f32; dim]; k];
    let mut counts = vec![0usize; k];
    for (profile, &label) in profiles.iter().zip(labels) {
        counts[label] += 1;
        for (s, x) in sums[label].iter_mut().zip(profile) {
            *s += x;
        }
    }
    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count == 0 {
                None
            } else {
                Some(sum.into_iter().map(|x| x / count as f32).collect())
            }
        })
        .collect())
}

#[inline]
fn check_dim(expected: usize, v: &[f32]) -> Result<()> {
    if v.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            found: v.len(),
        });
    }
    Ok(())
}
