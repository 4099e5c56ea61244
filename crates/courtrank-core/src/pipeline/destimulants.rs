// Polarity flip for features where lower is better.

use crate::error::PipelineError;
use crate::features::Feature;
use crate::stats;
use crate::table::FeatureTable;

/// `max - v` for every value.
pub fn flip(values: &[f64], max: f64) -> Vec<f64> {
    values.iter().map(|v| max - v).collect()
}

/// Flip each destimulant column against its own current maximum so that
/// higher is better across the whole table.
pub fn transform_destimulants(
    table: FeatureTable,
    destimulants: &[Feature],
) -> Result<FeatureTable, PipelineError> {
    let mut table = table;
    for &feature in destimulants {
        table = table.map_column(feature, |values| flip(values, stats::max(values)))?;
    }
    Ok(table)
}
