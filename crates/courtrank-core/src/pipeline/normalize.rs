// Normalization strategies.

use crate::error::PipelineError;
use crate::features::Feature;
use crate::stats::{self, ColumnStats};
use crate::table::{Column, FeatureTable};
use std::fmt;

/// Range, deviation or mean below this magnitude counts as zero.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// NaN (too few rows) is as unusable as zero.
fn is_degenerate(x: f64) -> bool {
    !x.is_finite() || x.abs() < DEGENERATE_EPSILON
}

/// The interchangeable rescaling strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// `(v - min) / (max - min)`, onto [0, 1].
    Unit,
    /// `(v - mean) / stdev`, zero mean and unit sample variance.
    Standardization,
    /// `v / mean`, a multiple of the column average.
    Ratio,
}

impl Normalization {
    pub const ALL: [Normalization; 3] = [
        Normalization::Unit,
        Normalization::Standardization,
        Normalization::Ratio,
    ];

    /// Stable identifier used to name output files.
    pub fn id(self) -> &'static str {
        match self {
            Normalization::Unit => "unit_normalization",
            Normalization::Standardization => "standardization",
            Normalization::Ratio => "ratio_transformation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Normalization::Unit => "unit normalization",
            Normalization::Standardization => "standardization",
            Normalization::Ratio => "ratio transformation",
        }
    }

    /// Rescale each of `features` into a new table. `table` is only read.
    pub fn normalize(
        self,
        table: &FeatureTable,
        features: &[Feature],
    ) -> Result<NormalizedTable, PipelineError> {
        let mut columns = Vec::with_capacity(features.len());
        for &feature in features {
            let values = table.column(feature)?;
            columns.push(Column {
                feature,
                values: self.rescale(feature, values)?,
            });
        }
        Ok(NormalizedTable {
            strategy: self,
            table: FeatureTable::new(table.players().to_vec(), columns)?,
        })
    }

    fn rescale(self, feature: Feature, values: &[f64]) -> Result<Vec<f64>, PipelineError> {
        let s: ColumnStats = stats::column_stats(values);
        let degenerate = |reason| PipelineError::DegenerateColumn {
            strategy: self,
            feature,
            reason,
        };
        match self {
            Normalization::Unit => {
                let range = s.max - s.min;
                if is_degenerate(range) {
                    return Err(degenerate("column range is zero"));
                }
                Ok(values.iter().map(|v| (v - s.min) / range).collect())
            }
            Normalization::Standardization => {
                if is_degenerate(s.stdev) {
                    return Err(degenerate("standard deviation is zero or undefined"));
                }
                Ok(values.iter().map(|v| (v - s.mean) / s.stdev).collect())
            }
            Normalization::Ratio => {
                if is_degenerate(s.mean) {
                    return Err(degenerate("column mean is zero"));
                }
                Ok(values.iter().map(|v| v / s.mean).collect())
            }
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one strategy: the rescaled feature columns only.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub strategy: Normalization,
    pub table: FeatureTable,
}
