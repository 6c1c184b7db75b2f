//! Row-wise normalization of profile vectors.
//!
//! Every mode transforms a vector against that vector's own statistics;
//! nothing here looks across rows. Scaling is applied before clustering so
//! that profiles with very different magnitudes can still be compared by
//! shape.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Row-wise scaling applied to each profile vector before clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalingMode {
    /// Leave values unchanged.
    #[default]
    Identity,
    /// Center on the vector's mean and divide by its sample standard
    /// deviation (n - 1 denominator).
    ZScore,
    /// Shift to the vector's minimum and divide by its range, mapping the
    /// vector onto `[0, 1]`.
    MinMax,
}

impl ScalingMode {
    /// Scales `vector` under this mode, returning a new vector of the same
    /// length.
    ///
    /// Z-score and min-max reject vectors they cannot scale (fewer than two
    /// values, zero variance, zero range) with
    /// [`Error::DegenerateScaling`] rather than emitting NaN or infinity.
    pub fn apply(self, vector: &[f32]) -> Result<Vec<f32>> {
        match self {
            ScalingMode::Identity => Ok(vector.to_vec()),
            ScalingMode::ZScore => zscore(vector),
            ScalingMode::MinMax => minmax(vector),
        }
    }

    /// Lower-case mode name as written in configuration.
    pub fn name(self) -> &'static str {
        match self {
            ScalingMode::Identity => "identity",
            ScalingMode::ZScore => "zscore",
            ScalingMode::MinMax => "minmax",
        }
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" => Ok(ScalingMode::Identity),
            "zscore" => Ok(ScalingMode::ZScore),
            "minmax" => Ok(ScalingMode::MinMax),
            _ => Err(Error::InvalidParameter {
                name: "scaling",
                message: "expected identity, zscore, or minmax",
            }),
        }
    }
}

fn mean(v: &[f32]) -> f64 {
    v.iter().map(|&x| f64::from(x)).sum::<f64>() / v.len() as f64
}

fn zscore(v: &[f32]) -> Result<Vec<f32>> {
    if v.len() < 2 {
        return Err(Error::DegenerateScaling {
            mode: "zscore",
            reason: "vector needs at least two values",
        });
    }
    let mu = mean(v);
    let var = v
        .iter()
        .map(|&x| {
            let d = f64::from(x) - mu;
            d * d
        })
        .sum::<f64>()
        / (v.len() - 1) as f64;
    if var == 0.0 {
        return Err(Error::DegenerateScaling {
            mode: "zscore",
            reason: "vector has zero variance",
        });
    }
    let sd = var.sqrt();
    Ok(v.iter().map(|&x| ((f64::from(x) - mu) / sd) as f32).collect())
}

fn minmax(v: &[f32]) -> Result<Vec<f32>> {
    if v.len() < 2 {
        return Err(Error::DegenerateScaling {
            mode: "minmax",
            reason: "vector needs at least two values",
        });
    }
    let (lo, hi) = v
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let range = hi - lo;
    if range == 0.0 {
        return Err(Error::DegenerateScaling {
            mode: "minmax",
            reason: "vector has zero range",
        });
    }
    Ok(v.iter().map(|&x| (x - lo) / range).collect())
}
