use thiserror::Error;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} profiles")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of profiles in the dataset.
        n_items: usize,
    },

    /// Vectors in a computation have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// An update pass produced a cluster with no members.
    #[error("cluster {cluster} has no members")]
    EmptyCluster {
        /// Index of the memberless cluster.
        cluster: usize,
    },

    /// A vector cannot be scaled under the requested mode.
    #[error("cannot {mode}-scale vector: {reason}")]
    DegenerateScaling {
        /// Scaling mode that rejected the vector.
        mode: &'static str,
        /// Why the vector was rejected.
        reason: &'static str,
    },

    /// A record in an expression table violates the input contract.
    #[error("invalid record on line {line}: {message}")]
    InvalidRecord {
        /// 1-based line number within the table, counting the header.
        line: u64,
        /// Human-readable explanation.
        message: String,
    },

    /// CSV layer failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
