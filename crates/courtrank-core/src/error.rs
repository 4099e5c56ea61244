// Errors raised by the ranking pipeline stages.

use crate::features::Feature;
use crate::pipeline::normalize::Normalization;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("column `{feature}` is not present in the table")]
    MissingColumn { feature: Feature },

    #[error("column `{feature}` has {actual} values, expected {expected}")]
    ColumnLength {
        feature: Feature,
        expected: usize,
        actual: usize,
    },

    #[error("no players remain after preprocessing")]
    EmptyTable,

    #[error("column `{feature}` has no observed values to take a median from")]
    NoObservedValues { feature: Feature },

    #[error("{strategy} is undefined for column `{feature}`: {reason}")]
    DegenerateColumn {
        strategy: Normalization,
        feature: Feature,
        reason: &'static str,
    },

    #[error("weight vector has {actual} entries but {expected} features are normalized")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("weight for `{feature}` must be finite, got {value}")]
    InvalidWeight { feature: Feature, value: f64 },
}
