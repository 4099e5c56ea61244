// Ranking output: one CSV per strategy plus the console preview.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use courtrank_core::{Normalization, PipelineError, Ranking};
use thiserror::Error;
use tracing::info;

use crate::config::OutputConfig;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// `<dir>/<prefix>_<strategy id>.csv`
pub fn ranking_path(dir: &Path, prefix: &str, strategy: Normalization) -> PathBuf {
    dir.join(format!("{}_{}.csv", prefix, strategy.id()))
}

/// Write every ranking to its CSV file. Returns the written paths in
/// ranking order.
pub fn write_rankings(
    rankings: &[Ranking],
    output: &OutputConfig,
) -> Result<Vec<PathBuf>, EmitError> {
    std::fs::create_dir_all(&output.dir).map_err(|e| EmitError::Io {
        path: output.dir.clone(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(rankings.len());
    for ranking in rankings {
        let path = ranking_path(&output.dir, &output.file_prefix, ranking.strategy);
        let file = File::create(&path).map_err(|e| EmitError::Io {
            path: path.clone(),
            source: e,
        })?;
        ranking
            .write_csv(BufWriter::new(file))
            .map_err(|e| EmitError::Csv {
                path: path.clone(),
                source: e,
            })?;
        info!(
            "wrote {} ranking ({} players) to {}",
            ranking.strategy.id(),
            ranking.entries.len(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}

/// Print the top `n` of each ranking, separated by blank lines.
pub fn print_previews<W: Write>(rankings: &[Ranking], n: usize, mut out: W) -> std::io::Result<()> {
    for (i, ranking) in rankings.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write!(out, "{}", ranking.preview(n))?;
    }
    out.flush()
}
