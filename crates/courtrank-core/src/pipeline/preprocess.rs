// Row filtering, median imputation and per-minute conversion.

use crate::error::PipelineError;
use crate::features::Feature;
use crate::stats;
use crate::table::{Column, FeatureTable, PlayerRecord};
use tracing::{debug, info, warn};

/// Players with this many seasons or fewer are dropped.
pub const DEFAULT_MIN_YEARS: f64 = 1.0;

/// Keep a player only with more than `min_years` seasons and a positive
/// minutes-played figure. Non-finite figures count as missing.
fn is_eligible(record: &PlayerRecord, min_years: f64) -> bool {
    let has_experience = record
        .yrs
        .is_some_and(|yrs| yrs.is_finite() && yrs > min_years);
    if !has_experience {
        return false;
    }
    match record.mp.filter(|mp| mp.is_finite()) {
        None => false,
        Some(mp) if mp <= 0.0 => {
            warn!(
                "dropping '{}': minutes played is {}, per-minute rates undefined",
                record.player, mp
            );
            false
        }
        Some(_) => true,
    }
}

/// Turn raw records into a dense table of `Yrs`, `MP` and the `tracked`
/// features.
///
/// Steps:
/// 1. Keep only players with a finite `Yrs > min_years`.
/// 2. Drop players whose `MP` is not a positive finite number.
/// 3. Fill missing or non-finite tracked values with the column median of
///    the kept rows.
/// 4. Divide count features (ORB, AST, STL, BLK, TOV, PTS) by `MP`.
pub fn preprocess(
    records: &[PlayerRecord],
    tracked: &[Feature],
    min_years: f64,
) -> Result<FeatureTable, PipelineError> {
    let kept: Vec<&PlayerRecord> = records
        .iter()
        .filter(|r| is_eligible(r, min_years))
        .collect();
    info!(
        "preprocess: kept {} of {} players (min_years > {})",
        kept.len(),
        records.len(),
        min_years
    );
    if kept.is_empty() {
        return Err(PipelineError::EmptyTable);
    }

    let players: Vec<String> = kept.iter().map(|r| r.player.clone()).collect();
    // Both are present on every kept row.
    let yrs: Vec<f64> = kept.iter().map(|r| r.yrs.unwrap_or_default()).collect();
    let mp: Vec<f64> = kept.iter().map(|r| r.mp.unwrap_or_default()).collect();

    let mut columns = vec![
        Column {
            feature: Feature::Yrs,
            values: yrs,
        },
        Column {
            feature: Feature::Mp,
            values: mp.clone(),
        },
    ];

    for &feature in tracked {
        let raw: Vec<Option<f64>> = kept
            .iter()
            .map(|r| r.get(feature).filter(|v| v.is_finite()))
            .collect();
        let mut values = fill_with_median(feature, &raw)?;
        if feature.is_count() {
            values = per_minute(&values, &mp);
        }
        columns.push(Column { feature, values });
    }

    FeatureTable::new(players, columns)
}

/// Replace `None` cells with the median of the observed cells.
///
/// Callers pass finite values only.
fn fill_with_median(feature: Feature, raw: &[Option<f64>]) -> Result<Vec<f64>, PipelineError> {
    let observed: Vec<f64> = raw.iter().flatten().copied().collect();
    let missing = raw.len() - observed.len();
    if missing == 0 {
        return Ok(observed);
    }
    if observed.is_empty() {
        return Err(PipelineError::NoObservedValues { feature });
    }
    let median = stats::median(&observed);
    debug!("{}: filled {} missing values with median {}", feature, missing, median);
    Ok(raw.iter().map(|v| v.unwrap_or(median)).collect())
}

fn per_minute(totals: &[f64], minutes: &[f64]) -> Vec<f64> {
    totals.iter().zip(minutes).map(|(t, m)| t / m).collect()
}
