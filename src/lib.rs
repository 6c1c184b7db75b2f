//! Expression-profile clustering and group reporting.
//!
//! `cohort` groups numeric expression profiles (one vector per entity over a
//! shared set of feature axes) into `k` clusters and summarizes the result
//! as a deterministic report ranking clusters by their dominant axis.
//!
//! The pipeline runs in four stages:
//! - row-wise scaling of each profile ([`scale`])
//! - two-phase k-means with stabilized random initialization ([`cluster`])
//! - dominant-axis group report ([`report`])
//! - optional SVG rendering of profiles and centers ([`render`])
//!
//! Tables load through [`dataset`], which enforces the `ID,NAME,<axes...>`
//! CSV contract.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod render;
pub mod report;
pub mod scale;

pub use cluster::{
    Assignment, Clustering, EmptyClusterPolicy, Kmeans, KmeansFit, DEFAULT_CONVERGE_THRESHOLD,
    DEFAULT_INIT_THRESHOLD,
};
pub use dataset::{Dataset, Profile};
pub use error::{Error, Result};
pub use render::{render_svg, RenderStyle};
pub use report::{ReportBuilder, ReportRow, DEFAULT_URL_TEMPLATE};
pub use scale::ScalingMode;
