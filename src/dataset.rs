//! Loading expression tables.
//!
//! The input contract is a CSV whose header starts with `ID,NAME` followed
//! by one column per feature axis. Every data row carries an integer id, a
//! display name, and one finite numeric value per axis.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::scale::ScalingMode;

/// One clusterable entity: stable id, display name, expression vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Stable numeric identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Expression values, one per dataset axis.
    pub vector: Vec<f32>,
}

/// A loaded expression table: shared feature axes plus one profile per row.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Feature axis labels, in column order.
    pub axes: Vec<String>,
    /// Profiles in row order.
    pub profiles: Vec<Profile>,
}

impl Dataset {
    /// Loads an expression table from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads an expression table from any reader.
    ///
    /// Fails fast on contract violations: a header not starting with
    /// `ID,NAME`, rows of unequal length, non-integer ids, or values that
    /// are not finite numbers (`NaN` and `inf` tokens parse but are
    /// rejected here).
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        if headers.len() < 3 || &headers[0] != "ID" || &headers[1] != "NAME" {
            return Err(Error::InvalidRecord {
                line: 1,
                message: "header must start with ID,NAME and carry at least one axis column"
                    .to_string(),
            });
        }
        let axes: Vec<String> = headers.iter().skip(2).map(str::to_owned).collect();

        let mut profiles = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let id = record[0].trim().parse::<u64>().map_err(|_| Error::InvalidRecord {
                line,
                message: format!("id {:?} is not a non-negative integer", &record[0]),
            })?;
            let name = record[1].to_string();
            let mut vector = Vec::with_capacity(axes.len());
            for (axis, field) in axes.iter().zip(record.iter().skip(2)) {
                let value = field.trim().parse::<f32>().map_err(|_| Error::InvalidRecord {
                    line,
                    message: format!("{axis} value {field:?} is not numeric"),
                })?;
                if !value.is_finite() {
                    return Err(Error::InvalidRecord {
                        line,
                        message: format!("{axis} value {field:?} is not finite"),
                    });
                }
                vector.push(value);
            }
            profiles.push(Profile { id, name, vector });
        }
        info!(
            profiles = profiles.len(),
            axes = axes.len(),
            "loaded expression table"
        );
        Ok(Dataset { axes, profiles })
    }

    /// Row-wise scaled copies of every profile vector, in profile order.
    pub fn scaled_vectors(&self, mode: ScalingMode) -> Result<Vec<Vec<f32>>> {
        self.profiles
            .iter()
            .map(|p| mode.apply(&p.vector))
            .collect()
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the table has no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
