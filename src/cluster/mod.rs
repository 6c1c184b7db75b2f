//! K-means clustering with stabilized random initialization.
//!
//! This module groups dense profile vectors into `k` hard clusters. The run
//! has two phases:
//!
//! ## Phase one: initialization stabilization
//!
//! Instead of refining the first random draw, the driver keeps drawing fresh
//! center sets (each a sample of `k` distinct profiles) and scoring them with
//! a full assignment pass. Sampling stops once the relative change between
//! consecutive trial errors drops below the stabilization threshold, which
//! filters out wildly unlucky draws before any refinement happens.
//!
//! ## Phase two: refinement
//!
//! Classic alternation from the surviving centers: assign each profile to
//! its nearest center, recompute each center as the mean of its members,
//! repeat until the relative change in total error drops below the
//! convergence threshold.
//!
//! The convergence signal for both phases is the plain (not squared) sum of
//! nearest-center Euclidean distances:
//!
//! ```text
//! E = Σ_i min_k ||x_i - μ_k||
//! ```
//!
//! Relative change is measured as `|E - E_prev| / E`, with a zero current
//! error treated as converged.
//!
//! ## Usage
//!
//! ```rust
//! use cohort::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]); // First two together
//! assert_ne!(labels[0], labels[2]); // Separate from last two
//! ```

mod driver;
mod step;
mod traits;

pub use driver::{
    EmptyClusterPolicy, Kmeans, KmeansFit, DEFAULT_CONVERGE_THRESHOLD, DEFAULT_INIT_THRESHOLD,
};
pub use step::{assign, update, Assignment};
pub use traits::Clustering;
