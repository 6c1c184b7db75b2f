//! Group report derived from a fitted clustering.
//!
//! Each cluster is summarized by its dominant axis (the feature where its
//! center peaks). Clusters are ranked by dominant axis into stable `GROUP`
//! numbers, and each cluster's `ASSIGNMENT` column lists the axes it won
//! outright, pooled across clusters that share a dominant axis.

use std::io;

use serde::{Deserialize, Serialize};

use crate::dataset::Profile;
use crate::error::{Error, Result};

/// Default reference-link template; `{}` is replaced by the profile id.
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.ncbi.nlm.nih.gov/gene/{}";

/// One line of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Stable numeric identifier of the profile.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Display name of the profile.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Rank of the profile's cluster among all clusters.
    #[serde(rename = "GROUP")]
    pub group: usize,
    /// Quoted, pipe-joined list of axes the cluster's group won.
    #[serde(rename = "ASSIGNMENT")]
    pub assignment: String,
    /// Reference link for the profile.
    #[serde(rename = "URL")]
    pub url: String,
}

/// Builds the final group report from centers, labels, and profiles.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    url_template: String,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl ReportBuilder {
    /// Creates a builder with the default reference-link template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reference-link template. The first `{}` is replaced by the
    /// profile id.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Derives one report row per profile.
    ///
    /// `GROUP` numbers clusters by (dominant axis, cluster index), so the
    /// same partition always reports the same groups no matter which random
    /// initialization produced it. Rows come back sorted by
    /// `(group, id, name)`.
    pub fn build(
        &self,
        centers: &[Vec<f32>],
        labels: &[usize],
        profiles: &[Profile],
        axes: &[String],
    ) -> Result<Vec<ReportRow>> {
        if centers.is_empty() || profiles.is_empty() || axes.is_empty() {
            return Err(Error::EmptyInput);
        }
        if labels.len() != profiles.len() {
            return Err(Error::InvalidParameter {
                name: "labels",
                message: "must have one entry per profile",
            });
        }
        let k = centers.len();
        for &label in labels {
            if label >= k {
                return Err(Error::InvalidParameter {
                    name: "labels",
                    message: "cluster index out of range",
                });
            }
        }
        for center in centers {
            if center.len() != axes.len() {
                return Err(Error::DimensionMismatch {
                    expected: axes.len(),
                    found: center.len(),
                });
            }
        }

        // Dominant axis per cluster: where the center peaks.
        let dominant: Vec<usize> = centers.iter().map(|c| argmax(c)).collect();

        // Axes each cluster wins: per axis, the cluster whose center is
        // highest there.
        let mut won: Vec<Vec<&str>> = vec![Vec::new(); k];
        for (axis, label) in axes.iter().enumerate() {
            let winner = argmax_by(k, |cluster| centers[cluster][axis]);
            won[winner].push(label.as_str());
        }

        // Clusters sharing a dominant axis share one pooled label list.
        let mut assignment = Vec::with_capacity(k);
        for cluster in 0..k {
            let mut pool: Vec<&str> = (0..k)
                .filter(|&other| dominant[other] == dominant[cluster])
                .flat_map(|other| won[other].iter().copied())
                .collect();
            pool.sort_unstable();
            assignment.push(format!("'{}'", pool.join("|")));
        }

        // Group numbers rank clusters by (dominant axis, cluster index).
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by_key(|&cluster| (dominant[cluster], cluster));
        let mut group_of = vec![0usize; k];
        for (rank, &cluster) in order.iter().enumerate() {
            group_of[cluster] = rank;
        }

        let mut rows: Vec<ReportRow> = profiles
            .iter()
            .zip(labels)
            .map(|(profile, &label)| ReportRow {
                id: profile.id,
                name: profile.name.clone(),
                group: group_of[label],
                assignment: assignment[label].clone(),
                url: self
                    .url_template
                    .replacen("{}", &profile.id.to_string(), 1),
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.group, a.id, &a.name).cmp(&(b.group, b.id, &b.name))
        });
        Ok(rows)
    }
}

/// Writes rows as CSV with the `ID,NAME,GROUP,ASSIGNMENT,URL` header.
pub fn write_csv<W: io::Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        w.write_record(["ID", "NAME", "GROUP", "ASSIGNMENT", "URL"])?;
    }
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Index of the first maximum.
fn argmax(values: &[f32]) -> usize {
    argmax_by(values.len(), |i| values[i])
}

fn argmax_by(n: usize, value: impl Fn(usize) -> f32) -> usize {
    let mut best = 0;
    for i in 1..n {
        // Strict `>` keeps the first maximum on ties.
        if value(i) > value(best) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: u64, name: &str) -> Profile {
        Profile {
            id,
            name: name.to_string(),
            vector: Vec::new(),
        }
    }

    fn axes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn derives_groups_and_assignments() {
        let centers = vec![vec![1.5, 1.0, 8.5], vec![8.5, 1.5, 1.0]];
        let labels = vec![0, 0, 1, 1];
        let profiles = vec![
            profile(101, "alpha"),
            profile(102, "beta"),
            profile(103, "gamma"),
            profile(104, "delta"),
        ];
        let rows = ReportBuilder::new()
            .build(&centers, &labels, &profiles, &axes(&["x", "y", "z"]))
            .unwrap();

        // Cluster 1 peaks on x, so it reports first; it also wins y.
        assert_eq!(rows[0].name, "gamma");
        assert_eq!(rows[0].group, 0);
        assert_eq!(rows[0].assignment, "'x|y'");
        assert_eq!(rows[1].name, "delta");
        assert_eq!(rows[2].name, "alpha");
        assert_eq!(rows[2].group, 1);
        assert_eq!(rows[2].assignment, "'z'");
        assert_eq!(rows[0].url, "https://www.ncbi.nlm.nih.gov/gene/103");
    }

    #[test]
    fn clusters_sharing_a_dominant_axis_pool_their_wins() {
        let centers = vec![vec![9.0, 1.0], vec![8.0, 2.0], vec![1.0, 9.0]];
        let labels = vec![0, 1, 2];
        let profiles = vec![profile(1, "a"), profile(2, "b"), profile(3, "c")];
        let rows = ReportBuilder::new()
            .build(&centers, &labels, &profiles, &axes(&["x", "y"]))
            .unwrap();

        // Clusters 0 and 1 both peak on x; only cluster 0 wins it, but both
        // report the pooled list.
        assert_eq!(rows[0].assignment, "'x'");
        assert_eq!(rows[1].assignment, "'x'");
        assert_eq!(rows[2].assignment, "'y'");
        assert_eq!(
            rows.iter().map(|r| r.group).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn dominant_axis_ties_take_the_first_axis() {
        let centers = vec![vec![5.0, 5.0], vec![1.0, 6.0]];
        let labels = vec![0, 1];
        let profiles = vec![profile(1, "a"), profile(2, "b")];
        let rows = ReportBuilder::new()
            .build(&centers, &labels, &profiles, &axes(&["x", "y"]))
            .unwrap();

        // Cluster 0 ties on x and y; the first axis wins, so it ranks ahead
        // of the y-dominant cluster.
        assert_eq!(rows[0].name, "a");
        assert_eq!(rows[0].group, 0);
        assert_eq!(rows[0].assignment, "'x'");
        assert_eq!(rows[1].assignment, "'y'");
    }

    #[test]
    fn rows_sort_by_group_then_id_then_name() {
        let centers = vec![vec![9.0, 1.0], vec![1.0, 9.0]];
        let labels = vec![1, 0, 1, 0];
        let profiles = vec![
            profile(40, "n"),
            profile(30, "m"),
            profile(20, "p"),
            profile(10, "q"),
        ];
        let rows = ReportBuilder::new()
            .build(&centers, &labels, &profiles, &axes(&["x", "y"]))
            .unwrap();
        let ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 30, 20, 40]);
    }

    #[test]
    fn custom_url_template_replaces_first_placeholder() {
        let centers = vec![vec![1.0]];
        let profiles = vec![profile(7, "solo")];
        let rows = ReportBuilder::new()
            .with_url_template("https://example.org/{}/view")
            .build(&centers, &[0], &profiles, &axes(&["x"]))
            .unwrap();
        assert_eq!(rows[0].url, "https://example.org/7/view");
    }

    #[test]
    fn rejects_inconsistent_shapes() {
        let centers = vec![vec![1.0, 2.0]];
        let profiles = vec![profile(1, "a")];
        let two_axes = axes(&["x", "y"]);
        assert!(matches!(
            ReportBuilder::new().build(&[], &[], &profiles, &two_axes),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            ReportBuilder::new().build(&centers, &[0, 0], &profiles, &two_axes),
            Err(Error::InvalidParameter { name: "labels", .. })
        ));
        assert!(matches!(
            ReportBuilder::new().build(&centers, &[1], &profiles, &two_axes),
            Err(Error::InvalidParameter { name: "labels", .. })
        ));
        assert!(matches!(
            ReportBuilder::new().build(&centers, &[0], &profiles, &axes(&["x"])),
            Err(Error::DimensionMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn csv_output_matches_the_contract() {
        let rows = vec![ReportRow {
            id: 103,
            name: "gamma".to_string(),
            group: 0,
            assignment: "'x|y'".to_string(),
            url: "https://www.ncbi.nlm.nih.gov/gene/103".to_string(),
        }];
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "ID,NAME,GROUP,ASSIGNMENT,URL\n\
             103,gamma,0,'x|y',https://www.ncbi.nlm.nih.gov/gene/103\n"
        );
    }

    #[test]
    fn empty_report_still_writes_the_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ID,NAME,GROUP,ASSIGNMENT,URL\n");
    }
}
