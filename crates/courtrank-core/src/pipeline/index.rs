// Synthetic index: a weighted sum over the normalized features of each row.

use crate::error::PipelineError;
use crate::pipeline::normalize::NormalizedTable;

/// Equal weights summing to one.
pub fn equal_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// One score per row: the dot product of the row with `weights`.
///
/// `weights` must align with the normalized columns. When `None`, every
/// feature gets `1 / n`, which makes the index the row mean.
pub fn compute_synthetic_index(
    normalized: &NormalizedTable,
    weights: Option<&[f64]>,
) -> Result<Vec<f64>, PipelineError> {
    let features = normalized.table.features();
    let weights = match weights {
        Some(w) => {
            if w.len() != features.len() {
                return Err(PipelineError::DimensionMismatch {
                    expected: features.len(),
                    actual: w.len(),
                });
            }
            if let Some((feature, value)) = features
                .iter()
                .zip(w)
                .find(|(_, value)| !value.is_finite())
            {
                return Err(PipelineError::InvalidWeight {
                    feature: *feature,
                    value: *value,
                });
            }
            w.to_vec()
        }
        None => equal_weights(features.len()),
    };

    Ok((0..normalized.table.len())
        .map(|i| {
            normalized
                .table
                .row(i)
                .iter()
                .zip(&weights)
                .map(|(v, w)| v * w)
                .sum::<f64>()
        })
        .collect())
}
