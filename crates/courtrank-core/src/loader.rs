// Player stats loading.
//
// Reads a comma-separated stats export with a header row. The files come out
// of a legacy tool in a single-byte code page, so the bytes are decoded to
// UTF-8 before the CSV reader sees them.

use crate::features::Feature;
use crate::table::PlayerRecord;
use encoding_rs::Encoding;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the identity column.
pub const PLAYER_COLUMN: &str = "Player";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("required column `{column}` missing from {path}")]
    MissingColumn { path: String, column: String },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One stats row. Empty cells and NA markers deserialize to `None`; extra
/// columns (rank, position, team, ...) are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    Player: String,
    #[serde(deserialize_with = "stat_cell")]
    Yrs: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    MP: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    ORB: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    AST: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    STL: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    BLK: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    PTS: Option<f64>,
    #[serde(rename = "FG%", deserialize_with = "stat_cell")]
    FG_PCT: Option<f64>,
    #[serde(rename = "3P%", deserialize_with = "stat_cell")]
    THREE_PCT: Option<f64>,
    #[serde(rename = "FT%", deserialize_with = "stat_cell")]
    FT_PCT: Option<f64>,
    #[serde(deserialize_with = "stat_cell")]
    TOV: Option<f64>,
}

/// Cell contents that stats exports use for "no value".
const MISSING_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "#N/A", "<NA>", "null", "NULL", "None",
];

/// A numeric cell. Blank cells, NA markers and non-finite numbers are
/// missing; anything else that is not a number is an error.
fn stat_cell<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let cell = raw.trim();
    if cell.is_empty() || MISSING_MARKERS.contains(&cell) {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|_| de::Error::custom(format!("invalid number `{cell}`")))?;
    Ok(value.is_finite().then_some(value))
}

impl From<RawPlayerRow> for PlayerRecord {
    fn from(raw: RawPlayerRow) -> Self {
        PlayerRecord {
            player: raw.Player.trim().to_string(),
            yrs: raw.Yrs,
            mp: raw.MP,
            orb: raw.ORB,
            ast: raw.AST,
            stl: raw.STL,
            blk: raw.BLK,
            pts: raw.PTS,
            fg_pct: raw.FG_PCT,
            three_pct: raw.THREE_PCT,
            ft_pct: raw.FT_PCT,
            tov: raw.TOV,
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

/// Parse UTF-8 CSV data. `required` lists the numeric columns that must be
/// present in the header besides `Player`; a missing one is reported by name
/// rather than silently read as all-missing.
///
/// Any row that fails to parse aborts the load.
pub fn load_players_from_reader<R: Read>(
    rdr: R,
    required: &[Feature],
    path: &str,
) -> Result<Vec<PlayerRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Csv {
            path: path.to_string(),
            source: e,
        })?
        .clone();
    let required_names = std::iter::once(PLAYER_COLUMN)
        .chain(required.iter().map(|f| f.column_name()));
    for column in required_names {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: path.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        let raw = result.map_err(|e| LoadError::Csv {
            path: path.to_string(),
            source: e,
        })?;
        players.push(PlayerRecord::from(raw));
    }
    debug!("parsed {} player rows from {}", players.len(), path);
    Ok(players)
}

/// Decode raw bytes from `encoding` to UTF-8. Unmappable bytes become U+FFFD
/// and are reported at `warn`.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            "input contained bytes not valid in {}; replaced with U+FFFD",
            used.name()
        );
    }
    text.into_owned()
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load player rows from a CSV file stored in `encoding`.
pub fn load_players(
    path: &Path,
    encoding: &'static Encoding,
    required: &[Feature],
) -> Result<Vec<PlayerRecord>, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let text = decode(&bytes, encoding);
    load_players_from_reader(text.as_bytes(), required, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
