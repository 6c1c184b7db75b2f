use crate::error::Result;

/// Common interface for hard clustering of profile vectors.
///
/// Implementations assign exactly one cluster label to every input vector;
/// there is no notion of noise or unassigned points.
pub trait Clustering {
    /// Fits the model and returns one cluster label per input vector, in
    /// input order.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;
}
