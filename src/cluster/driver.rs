//! Two-phase k-means driver.
//!
//! Phase one draws fresh random center sets and keeps resampling until the
//! assignment error of consecutive trials stabilizes. Phase two refines the
//! surviving centers with alternating assign/update passes until the error
//! stops moving. Both phases compare against a sentinel on their first pass,
//! so each runs at least once, and neither has an iteration cap: they stop
//! on convergence only. Profile values must be finite; [`Kmeans::fit`]
//! rejects `NaN`s and infinities before the first pass.

use rand::prelude::*;
use tracing::debug;

use super::step::{self, Assignment};
use super::traits::Clustering;
use crate::error::{Error, Result};

/// Stabilization threshold for the random-restart phase.
pub const DEFAULT_INIT_THRESHOLD: f64 = 1e-2;

/// Convergence threshold for the refinement phase.
pub const DEFAULT_CONVERGE_THRESHOLD: f64 = 1e-4;

/// Sentinel standing in for "no previous error" on a phase's first pass.
const SENTINEL_ERROR: f64 = 1.0;

/// What to do when an update pass leaves a cluster with no members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Replace the empty cluster's center with a randomly drawn profile.
    #[default]
    Reseed,
    /// Abort the run with [`Error::EmptyCluster`].
    Fail,
}

/// K-means clusterer with stabilized random initialization.
///
/// ## Usage
///
/// ```rust
/// use cohort::{Clustering, Kmeans};
///
/// let data = vec![
///     vec![1.0, 1.0, 9.0],
///     vec![2.0, 1.0, 8.0],
///     vec![9.0, 1.0, 1.0],
///     vec![8.0, 2.0, 1.0],
/// ];
///
/// let labels = Kmeans::new(2).with_seed(42).fit_predict(&data)?;
/// assert_eq!(labels[0], labels[1]);
/// assert_ne!(labels[0], labels[2]);
/// # Ok::<(), cohort::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    init_threshold: f64,
    converge_threshold: f64,
    empty_policy: EmptyClusterPolicy,
    seed: Option<u64>,
}

/// Outcome of [`Kmeans::fit`].
///
/// `labels` come from the final assignment pass, which ran against the
/// centers one update behind `centers`. Callers that need labels consistent
/// with `centers` can run [`step::assign`] once more; the report derivation
/// deliberately uses the pairing as returned.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final centers, one update pass ahead of `labels`.
    pub centers: Vec<Vec<f32>>,
    /// Cluster index per profile, in input order.
    pub labels: Vec<usize>,
    /// Total assignment error of the final pass.
    pub total_error: f64,
    /// Random center sets drawn before initialization stabilized.
    pub init_trials: usize,
    /// Assign/update passes run before refinement converged.
    pub refine_passes: usize,
}

/// Driver state between passes.
enum State {
    /// Drawing fresh random center trials until the error stabilizes.
    Sampling { prev_error: f64 },
    /// The last completed trial's centers graduate to refinement.
    Stabilized { centers: Vec<Vec<f32>> },
    /// Alternating assign/update passes from the stabilized centers.
    Refining { prev_error: f64, centers: Vec<Vec<f32>> },
    /// Refinement stopped moving.
    Converged {
        centers: Vec<Vec<f32>>,
        labels: Vec<usize>,
        total_error: f64,
    },
}

impl Kmeans {
    /// Creates a clusterer for `k` clusters with default thresholds.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            init_threshold: DEFAULT_INIT_THRESHOLD,
            converge_threshold: DEFAULT_CONVERGE_THRESHOLD,
            empty_policy: EmptyClusterPolicy::default(),
            seed: None,
        }
    }

    /// Sets the RNG seed for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the stabilization threshold for the sampling phase.
    ///
    /// Must lie in `(0, 1)`; validated at fit time.
    pub fn with_init_threshold(mut self, threshold: f64) -> Self {
        self.init_threshold = threshold;
        self
    }

    /// Sets the convergence threshold for the refinement phase.
    ///
    /// Must lie in `(0, 1)`; validated at fit time.
    pub fn with_converge_threshold(mut self, threshold: f64) -> Self {
        self.converge_threshold = threshold;
        self
    }

    /// Sets the empty-cluster policy.
    pub fn with_empty_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    /// Runs both phases and returns centers, labels, and run statistics.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        self.validate(data)?;
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        };

        let mut init_trials = 0usize;
        let mut refine_passes = 0usize;
        let mut state = State::Sampling {
            prev_error: SENTINEL_ERROR,
        };
        loop {
            state = match state {
                State::Sampling { prev_error } => {
                    init_trials += 1;
                    let trial: Vec<Vec<f32>> =
                        data.choose_multiple(&mut *rng, self.k).cloned().collect();
                    let Assignment { total_error, .. } = step::assign(&trial, data)?;
                    if relative_error(total_error, prev_error) < self.init_threshold {
                        State::Stabilized { centers: trial }
                    } else {
                        State::Sampling {
                            prev_error: total_error,
                        }
                    }
                }
                State::Stabilized { centers } => {
                    debug!(trials = init_trials, "initialization stabilized");
                    State::Refining {
                        prev_error: SENTINEL_ERROR,
                        centers,
                    }
                }
                State::Refining { prev_error, centers } => {
                    refine_passes += 1;
                    let Assignment { total_error, labels } = step::assign(&centers, data)?;
                    let next_centers = self.updated_centers(&labels, data, &mut *rng)?;
                    if relative_error(total_error, prev_error) < self.converge_threshold {
                        State::Converged {
                            centers: next_centers,
                            labels,
                            total_error,
                        }
                    } else {
                        State::Refining {
                            prev_error: total_error,
                            centers: next_centers,
                        }
                    }
                }
                State::Converged {
                    centers,
                    labels,
                    total_error,
                } => {
                    debug!(
                        passes = refine_passes,
                        total_error, "refinement converged"
                    );
                    return Ok(KmeansFit {
                        centers,
                        labels,
                        total_error,
                        init_trials,
                        refine_passes,
                    });
                }
            };
        }
    }

    fn validate(&self, data: &[Vec<f32>]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: data.len(),
            });
        }
        for (name, threshold) in [
            ("init_threshold", self.init_threshold),
            ("converge_threshold", self.converge_threshold),
        ] {
            if !(threshold > 0.0 && threshold < 1.0) {
                return Err(Error::InvalidParameter {
                    name,
                    message: "must lie in (0, 1)",
                });
            }
        }
        let dim = data[0].len();
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "profiles must have at least one dimension",
            });
        }
        for p in &data[1..] {
            if p.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: p.len(),
                });
            }
        }
        // A non-finite value turns `relative_error` into NaN, which never
        // compares below a threshold, so neither phase could stop.
        if data.iter().flatten().any(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "profile values must be finite",
            });
        }
        Ok(())
    }

    /// Runs one update pass and applies the empty-cluster policy.
    fn updated_centers(
        &self,
        labels: &[usize],
        data: &[Vec<f32>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Vec<f32>>> {
        let means = step::update(labels, data, self.k)?;
        let mut centers = Vec::with_capacity(self.k);
        for (cluster, mean) in means.into_iter().enumerate() {
            match mean {
                Some(center) => centers.push(center),
                None => match self.empty_policy {
                    EmptyClusterPolicy::Fail => return Err(Error::EmptyCluster { cluster }),
                    EmptyClusterPolicy::Reseed => {
                        debug!(cluster, "reseeding empty cluster from a random profile");
                        // `data` was validated non-empty, so the draw succeeds.
                        let replacement = data.choose(rng).ok_or(Error::EmptyInput)?;
                        centers.push(replacement.clone());
                    }
                },
            }
        }
        Ok(centers)
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Relative change `|current - previous| / current`.
///
/// A current error of zero means every profile sits exactly on a center;
/// that is reported as fully converged instead of dividing by zero.
fn relative_error(current: f64, previous: f64) -> f64 {
    if current == 0.0 {
        return 0.0;
    }
    (current - previous).abs() / current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 1.0, 9.0],
            vec![2.0, 1.0, 8.0],
            vec![9.0, 1.0, 1.0],
            vec![8.0, 2.0, 1.0],
        ]
    }

    #[test]
    fn separates_two_blobs() {
        let fit = Kmeans::new(2).with_seed(42).fit(&two_blobs()).unwrap();
        assert_eq!(fit.labels.len(), 4);
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[2], fit.labels[3]);
        assert_ne!(fit.labels[0], fit.labels[2]);
        assert_eq!(fit.centers.len(), 2);
        assert!(fit.init_trials >= 1);
        assert!(fit.refine_passes >= 1);
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let data = two_blobs();
        let a = Kmeans::new(2).with_seed(7).fit(&data).unwrap();
        let b = Kmeans::new(2).with_seed(7).fit(&data).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centers, b.centers);
        assert_eq!(a.total_error, b.total_error);
        assert_eq!(a.init_trials, b.init_trials);
        assert_eq!(a.refine_passes, b.refine_passes);
    }

    #[test]
    fn k_equal_to_n_reaches_zero_error() {
        let data = two_blobs();
        let fit = Kmeans::new(4).with_seed(3).fit(&data).unwrap();
        assert_eq!(fit.total_error, 0.0);
        let mut sorted = fit.labels.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn identical_profiles_converge_immediately() {
        let data = vec![vec![5.0, 5.0]; 4];
        let fit = Kmeans::new(2).with_seed(11).fit(&data).unwrap();
        assert_eq!(fit.total_error, 0.0);
        assert_eq!(fit.init_trials, 1);
        assert_eq!(fit.refine_passes, 1);
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert_eq!(fit.centers.len(), 2);
    }

    #[test]
    fn fail_policy_surfaces_empty_cluster() {
        // Identical profiles all tie-break to cluster 0, starving cluster 1.
        let data = vec![vec![5.0, 5.0]; 4];
        let err = Kmeans::new(2)
            .with_seed(11)
            .with_empty_policy(EmptyClusterPolicy::Fail)
            .fit(&data)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCluster { cluster: 1 }));
    }

    #[test]
    fn rejects_bad_parameters() {
        let data = two_blobs();
        assert!(matches!(
            Kmeans::new(0).fit(&data),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
        assert!(matches!(
            Kmeans::new(5).fit(&data),
            Err(Error::InvalidClusterCount {
                requested: 5,
                n_items: 4
            })
        ));
        assert!(matches!(
            Kmeans::new(2).fit(&[]),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            Kmeans::new(2).with_init_threshold(1.0).fit(&data),
            Err(Error::InvalidParameter {
                name: "init_threshold",
                ..
            })
        ));
        assert!(matches!(
            Kmeans::new(2).with_converge_threshold(0.0).fit(&data),
            Err(Error::InvalidParameter {
                name: "converge_threshold",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_finite_profiles() {
        let with_nan = vec![vec![f32::NAN, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]];
        assert!(matches!(
            Kmeans::new(1).with_seed(42).fit(&with_nan),
            Err(Error::InvalidParameter { name: "data", .. })
        ));
        let with_inf = vec![vec![1.0, 2.0], vec![f32::INFINITY, 3.0]];
        assert!(matches!(
            Kmeans::new(2).fit(&with_inf),
            Err(Error::InvalidParameter { name: "data", .. })
        ));
    }

    #[test]
    fn rejects_ragged_profiles() {
        let data = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            Kmeans::new(1).fit(&data),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn fit_predict_matches_fit_labels() {
        let data = two_blobs();
        let model = Kmeans::new(2).with_seed(42);
        let fit = model.fit(&data).unwrap();
        let labels = model.fit_predict(&data).unwrap();
        assert_eq!(labels, fit.labels);
        assert_eq!(model.n_clusters(), 2);
    }

    #[test]
    fn relative_error_guards_zero_current() {
        assert_eq!(relative_error(0.0, 5.0), 0.0);
        assert_eq!(relative_error(0.0, SENTINEL_ERROR), 0.0);
        assert!((relative_error(2.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((relative_error(1.0, 2.0) - 1.0).abs() < 1e-12);
    }
}
