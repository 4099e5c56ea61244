// Tukey-fence outlier replacement.

use crate::error::PipelineError;
use crate::features::Feature;
use crate::stats;
use crate::table::FeatureTable;
use tracing::debug;

/// Standard Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Inclusive bounds outside which a value counts as an outlier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub lower: f64,
    pub upper: f64,
}

impl Fence {
    /// `[Q1 - k*IQR, Q3 + k*IQR]` over `values`.
    pub fn from_values(values: &[f64], multiplier: f64) -> Fence {
        let q1 = stats::quantile(values, 0.25);
        let q3 = stats::quantile(values, 0.75);
        let iqr = q3 - q1;
        Fence {
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Replace values strictly outside the column's fence with the column mean.
///
/// The mean is taken once, over the unmodified column, and a replaced value
/// is not checked again.
pub fn replace_outliers(values: &[f64], multiplier: f64) -> (Vec<f64>, usize) {
    let fence = Fence::from_values(values, multiplier);
    let mean = stats::mean(values);
    let mut replaced = 0;
    let out = values
        .iter()
        .map(|&v| {
            if fence.contains(v) {
                v
            } else {
                replaced += 1;
                mean
            }
        })
        .collect();
    (out, replaced)
}

/// Apply [`replace_outliers`] to each of `features` independently.
pub fn impute_outliers(
    table: FeatureTable,
    features: &[Feature],
    multiplier: f64,
) -> Result<FeatureTable, PipelineError> {
    let mut table = table;
    for &feature in features {
        let (values, replaced) = replace_outliers(table.column(feature)?, multiplier);
        if replaced > 0 {
            debug!("{}: replaced {} outliers with the column mean", feature, replaced);
        }
        table = table.with_column(feature, values)?;
    }
    Ok(table)
}
