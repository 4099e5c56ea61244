// courtrank entry point.
//
// Startup sequence:
// 1. Initialize tracing (append to logs/courtrank.log, stdout is kept for
//    the preview)
// 2. Seed config/ from defaults/ and load it
// 3. Run the pipeline and write the outputs

use courtrank::config;
use courtrank::runner;

use anyhow::Context;
use std::path::PathBuf;
use tracing::{error, info};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "courtrank=info,courtrank_core=info,warn";

fn main() -> anyhow::Result<()> {
    let log_path = init_tracing()?;
    info!("courtrank starting up, logging to {}", log_path.display());

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: input={}, encoding={}, histograms={}",
        config.input.display(),
        config.encoding.name(),
        config.histograms.enabled
    );

    let stdout = std::io::stdout();
    let summary =
        runner::run(&config, stdout.lock()).inspect_err(|e| error!("run failed: {e:#}"))?;
    info!(
        "done: {} rankings, {} histograms",
        summary.ranking_files.len(),
        summary.histogram_files.len()
    );

    Ok(())
}

/// Log to `logs/courtrank.log`, appending so earlier runs stay readable.
/// Returns the log file path.
fn init_tracing() -> anyhow::Result<PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()
        .context("failed to resolve working directory")?
        .join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_path = log_dir.join("courtrank.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(log_path)
}
