// Player rows as loaded, and the dense column table the pipeline works on.

use crate::error::PipelineError;
use crate::features::Feature;

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One player row from the stats file. Any numeric cell may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRecord {
    pub player: String,
    pub yrs: Option<f64>,
    pub mp: Option<f64>,
    pub orb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub pts: Option<f64>,
    pub fg_pct: Option<f64>,
    pub three_pct: Option<f64>,
    pub ft_pct: Option<f64>,
    pub tov: Option<f64>,
}

impl PlayerRecord {
    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Yrs => self.yrs,
            Feature::Mp => self.mp,
            Feature::Orb => self.orb,
            Feature::Ast => self.ast,
            Feature::Stl => self.stl,
            Feature::Blk => self.blk,
            Feature::Pts => self.pts,
            Feature::FgPct => self.fg_pct,
            Feature::ThreePct => self.three_pct,
            Feature::FtPct => self.ft_pct,
            Feature::Tov => self.tov,
        }
    }

    /// Builder-style setter for test fixtures.
    #[cfg(test)]
    pub(crate) fn with(mut self, feature: Feature, value: f64) -> Self {
        let slot = match feature {
            Feature::Yrs => &mut self.yrs,
            Feature::Mp => &mut self.mp,
            Feature::Orb => &mut self.orb,
            Feature::Ast => &mut self.ast,
            Feature::Stl => &mut self.stl,
            Feature::Blk => &mut self.blk,
            Feature::Pts => &mut self.pts,
            Feature::FgPct => &mut self.fg_pct,
            Feature::ThreePct => &mut self.three_pct,
            Feature::FtPct => &mut self.ft_pct,
            Feature::Tov => &mut self.tov,
        };
        *slot = Some(value);
        self
    }
}

// ---------------------------------------------------------------------------
// Dense table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub feature: Feature,
    pub values: Vec<f64>,
}

/// Players and fully populated numeric columns, one value per player.
///
/// Stages never mutate a table they were handed by reference; they build a
/// new one.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    players: Vec<String>,
    columns: Vec<Column>,
}

impl FeatureTable {
    /// Build a table, checking every column has one value per player.
    /// A repeated feature keeps its last column.
    pub fn new(players: Vec<String>, columns: Vec<Column>) -> Result<Self, PipelineError> {
        let mut table = FeatureTable {
            players,
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            table = table.with_column(column.feature, column.values)?;
        }
        Ok(table)
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Features present, in column order.
    pub fn features(&self) -> Vec<Feature> {
        self.columns.iter().map(|c| c.feature).collect()
    }

    pub fn column(&self, feature: Feature) -> Result<&[f64], PipelineError> {
        self.columns
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.values.as_slice())
            .ok_or(PipelineError::MissingColumn { feature })
    }

    /// Return a table with `feature` set to `values`, replacing an existing
    /// column in place or appending a new one.
    pub fn with_column(mut self, feature: Feature, values: Vec<f64>) -> Result<Self, PipelineError> {
        if values.len() != self.players.len() {
            return Err(PipelineError::ColumnLength {
                feature,
                expected: self.players.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.feature == feature) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { feature, values }),
        }
        Ok(self)
    }

    /// Apply `f` to a column and return the resulting table.
    pub fn map_column<F>(self, feature: Feature, f: F) -> Result<Self, PipelineError>
    where
        F: FnOnce(&[f64]) -> Vec<f64>,
    {
        let values = f(self.column(feature)?);
        self.with_column(feature, values)
    }

    /// A copy restricted to `features`, in the given order.
    pub fn select(&self, features: &[Feature]) -> Result<FeatureTable, PipelineError> {
        let columns = features
            .iter()
            .map(|&feature| {
                self.column(feature).map(|values| Column {
                    feature,
                    values: values.to_vec(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeatureTable {
            players: self.players.clone(),
            columns,
        })
    }

    /// Values of one row across all columns, in column order.
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c.values[index]).collect()
    }
}
