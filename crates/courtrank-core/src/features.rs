// Stat columns and their stimulant/destimulant classification.

use std::fmt;

// ---------------------------------------------------------------------------
// Feature columns
// ---------------------------------------------------------------------------

/// A numeric column of the player stats file.
///
/// `Yrs` and `Mp` are bookkeeping columns used by preprocessing; every other
/// variant is a rankable feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Yrs,
    Mp,
    Orb,
    Ast,
    Stl,
    Blk,
    Pts,
    FgPct,
    ThreePct,
    FtPct,
    Tov,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::Yrs,
        Feature::Mp,
        Feature::Orb,
        Feature::Ast,
        Feature::Stl,
        Feature::Blk,
        Feature::Pts,
        Feature::FgPct,
        Feature::ThreePct,
        Feature::FtPct,
        Feature::Tov,
    ];

    /// Header name in the input CSV. Exact match, case-sensitive.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Yrs => "Yrs",
            Feature::Mp => "MP",
            Feature::Orb => "ORB",
            Feature::Ast => "AST",
            Feature::Stl => "STL",
            Feature::Blk => "BLK",
            Feature::Pts => "PTS",
            Feature::FgPct => "FG%",
            Feature::ThreePct => "3P%",
            Feature::FtPct => "FT%",
            Feature::Tov => "TOV",
        }
    }

    /// File-system safe stem (`FG%` -> `FG_pct`).
    pub fn file_stem(self) -> String {
        self.column_name().replace('%', "_pct")
    }

    pub fn from_column_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// Cumulative season totals that are converted to per-minute rates.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            Feature::Orb | Feature::Ast | Feature::Stl | Feature::Blk | Feature::Tov | Feature::Pts
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Partition of the rankable features by polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    /// Higher raw value is better.
    pub stimulants: Vec<Feature>,
    /// Lower raw value is better; flipped before aggregation.
    pub destimulants: Vec<Feature>,
    /// Categorical columns, ignored by every stage.
    pub nominals: Vec<Feature>,
}

impl FeatureSpec {
    /// The fixed classification used for the roster file.
    pub fn roster() -> Self {
        FeatureSpec {
            stimulants: vec![
                Feature::Orb,
                Feature::Ast,
                Feature::Stl,
                Feature::Blk,
                Feature::Pts,
                Feature::FgPct,
                Feature::ThreePct,
                Feature::FtPct,
            ],
            destimulants: vec![Feature::Tov],
            nominals: Vec::new(),
        }
    }

    /// Stimulants followed by destimulants. This order is the column order of
    /// every normalized table and of any weight vector.
    pub fn tracked(&self) -> Vec<Feature> {
        self.stimulants
            .iter()
            .chain(self.destimulants.iter())
            .copied()
            .collect()
    }

    /// Columns the input file must carry besides `Player`: the eligibility
    /// inputs and every tracked feature.
    pub fn required_columns(&self) -> Vec<Feature> {
        let mut cols = vec![Feature::Yrs, Feature::Mp];
        cols.extend(self.tracked());
        cols
    }
}

impl Default for FeatureSpec {
    fn default() -> Self {
        FeatureSpec::roster()
    }
}
