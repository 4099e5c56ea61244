// Pipeline stages and the functions that chain them.
//
// raw records -> preprocess -> outliers -> destimulants -> (per strategy)
// normalize -> synthetic index -> ranking

pub mod destimulants;
pub mod index;
pub mod normalize;
pub mod outliers;
pub mod preprocess;

use crate::error::PipelineError;
use crate::features::FeatureSpec;
use crate::ranking::Ranking;
use crate::table::{FeatureTable, PlayerRecord};
use normalize::Normalization;
use tracing::info;

/// Tunables for the stages before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub min_years: f64,
    pub iqr_multiplier: f64,
    /// Aligned with `FeatureSpec::tracked()`. `None` means equal weights.
    pub weights: Option<Vec<f64>>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            min_years: preprocess::DEFAULT_MIN_YEARS,
            iqr_multiplier: outliers::DEFAULT_IQR_MULTIPLIER,
            weights: None,
        }
    }
}

/// Preprocess, impute outliers and flip destimulants. The result is the
/// shared source table every strategy reads from.
pub fn prepare(
    records: &[PlayerRecord],
    spec: &FeatureSpec,
    options: &PipelineOptions,
) -> Result<FeatureTable, PipelineError> {
    let tracked = spec.tracked();
    let table = preprocess::preprocess(records, &tracked, options.min_years)?;
    let table = outliers::impute_outliers(table, &tracked, options.iqr_multiplier)?;
    destimulants::transform_destimulants(table, &spec.destimulants)
}

/// Normalize the prepared table with one strategy and rank the players.
pub fn rank(
    table: &FeatureTable,
    spec: &FeatureSpec,
    strategy: Normalization,
    weights: Option<&[f64]>,
) -> Result<Ranking, PipelineError> {
    let normalized = strategy.normalize(table, &spec.tracked())?;
    let scores = index::compute_synthetic_index(&normalized, weights)?;
    Ok(Ranking::new(strategy, normalized.table.players(), &scores))
}

/// Rank with every strategy. Either all rankings are produced or the first
/// error is returned.
pub fn rank_all(
    table: &FeatureTable,
    spec: &FeatureSpec,
    weights: Option<&[f64]>,
) -> Result<Vec<Ranking>, PipelineError> {
    Normalization::ALL
        .iter()
        .map(|&strategy| {
            let ranking = rank(table, spec, strategy, weights)?;
            info!("ranked {} players with {}", ranking.entries.len(), strategy);
            Ok(ranking)
        })
        .collect()
}

/// `prepare` followed by `rank_all`.
pub fn run(
    records: &[PlayerRecord],
    spec: &FeatureSpec,
    options: &PipelineOptions,
) -> Result<Vec<Ranking>, PipelineError> {
    let table = prepare(records, spec, options)?;
    rank_all(&table, spec, options.weights.as_deref())
}
