// One full ranking run: load, prepare, rank with every strategy, emit.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use courtrank_core::features::FeatureSpec;
use courtrank_core::{loader, pipeline, Ranking};
use tracing::info;

use crate::config::Config;
use crate::{histogram, report};

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub rankings: Vec<Ranking>,
    pub ranking_files: Vec<PathBuf>,
    pub histogram_files: Vec<PathBuf>,
}

/// Run the pipeline described by `config` and print the previews to `out`.
///
/// Nothing is written until every strategy has produced its ranking.
pub fn run<W: Write>(config: &Config, out: W) -> anyhow::Result<RunSummary> {
    let spec = FeatureSpec::roster();

    let records = loader::load_players(&config.input, config.encoding, &spec.required_columns())
        .with_context(|| format!("failed to load players from {}", config.input.display()))?;
    info!("loaded {} player rows", records.len());

    let table = pipeline::prepare(&records, &spec, &config.pipeline)
        .context("failed to prepare feature table")?;
    let rankings = pipeline::rank_all(&table, &spec, config.pipeline.weights.as_deref())
        .context("failed to rank players")?;

    let histogram_files = if config.histograms.enabled {
        histogram::write_histograms(&table, &spec.tracked(), &config.histograms)
            .context("failed to write histograms")?
    } else {
        Vec::new()
    };

    let ranking_files =
        report::write_rankings(&rankings, &config.output).context("failed to write rankings")?;
    report::print_previews(&rankings, config.output.preview_size, out)
        .context("failed to print ranking preview")?;

    Ok(RunSummary {
        rankings,
        ranking_files,
        histogram_files,
    })
}
