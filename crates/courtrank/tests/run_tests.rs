// End-to-end runs: seeded config, fixture roster, files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use courtrank::config::{self, CONFIG_FILE};
use courtrank::runner;

// ===========================================================================
// Test helpers
// ===========================================================================

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A base dir with the shipped defaults and the fixture roster as
/// `players1.csv`.
fn project_dir() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let defaults = tmp.path().join("defaults");
    fs::create_dir_all(&defaults).unwrap();
    fs::copy(
        workspace_root().join("defaults").join(CONFIG_FILE),
        defaults.join(CONFIG_FILE),
    )
    .unwrap();
    fs::copy(
        workspace_root().join("crates/courtrank-core/tests/fixtures/roster.csv"),
        tmp.path().join("players1.csv"),
    )
    .unwrap();
    tmp
}

fn rewrite_config(base: &Path, from: &str, to: &str) {
    let path = base.join("config").join(CONFIG_FILE);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(from), "config has no `{from}`");
    fs::write(&path, text.replace(from, to)).unwrap();
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn default_run_writes_rankings_histograms_and_preview() {
    let tmp = project_dir();
    config::seed_config(tmp.path()).unwrap();
    let config = config::load_config_from(tmp.path()).unwrap();

    let mut stdout = Vec::new();
    let summary = runner::run(&config, &mut stdout).unwrap();

    assert_eq!(summary.rankings.len(), 3);
    assert_eq!(summary.ranking_files.len(), 3);
    assert_eq!(summary.histogram_files.len(), 9);

    for id in ["unit_normalization", "standardization", "ratio_transformation"] {
        let path = tmp.path().join(format!("ranking_lakers_{id}.csv"));
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5, "{id}: header plus four players");
        assert_eq!(lines[0], "Player,Synthetic_Index");
        assert!(lines[1].starts_with("Alpha,"));
        assert!(lines[4].starts_with("Delta,"));
    }

    let plots = tmp.path().join("plots").join("histograms");
    for stem in ["ORB", "AST", "STL", "BLK", "PTS", "FG_pct", "3P_pct", "FT_pct", "TOV"] {
        assert!(plots.join(format!("{stem}.txt")).exists(), "missing {stem}");
    }

    let preview = String::from_utf8(stdout).unwrap();
    assert!(preview.contains("Top 4 players (unit normalization):"));
    assert!(preview.contains("Top 4 players (standardization):"));
    assert!(preview.contains("Top 4 players (ratio transformation):"));
    assert!(!preview.contains("Rookie"));
}

#[test]
fn disabled_histograms_write_nothing() {
    let tmp = project_dir();
    config::seed_config(tmp.path()).unwrap();
    rewrite_config(tmp.path(), "enabled = true", "enabled = false");
    let config = config::load_config_from(tmp.path()).unwrap();

    let summary = runner::run(&config, std::io::sink()).unwrap();
    assert!(summary.histogram_files.is_empty());
    assert!(!tmp.path().join("plots").exists());
}

#[test]
fn missing_input_fails_before_any_output() {
    let tmp = project_dir();
    config::seed_config(tmp.path()).unwrap();
    fs::remove_file(tmp.path().join("players1.csv")).unwrap();
    let config = config::load_config_from(tmp.path()).unwrap();

    let err = runner::run(&config, std::io::sink()).unwrap_err();
    assert!(err.to_string().contains("failed to load players"));
    assert!(!tmp
        .path()
        .join("ranking_lakers_unit_normalization.csv")
        .exists());
}

#[test]
fn degenerate_column_leaves_no_partial_output() {
    let tmp = project_dir();
    config::seed_config(tmp.path()).unwrap();

    // Same FT% for everyone
    let csv_path = tmp.path().join("players1.csv");
    let text = fs::read_to_string(&csv_path).unwrap();
    let flattened: Vec<String> = text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line.to_string();
            }
            let mut cells: Vec<&str> = line.split(',').collect();
            let last = cells.len() - 1;
            cells[last] = "0.800";
            cells.join(",")
        })
        .collect();
    fs::write(&csv_path, flattened.join("\n")).unwrap();

    let config = config::load_config_from(tmp.path()).unwrap();
    let err = runner::run(&config, std::io::sink()).unwrap_err();
    assert!(format!("{err:#}").contains("FT%"));
    assert!(!tmp.path().join("plots").exists());
    assert!(!tmp
        .path()
        .join("ranking_lakers_standardization.csv")
        .exists());
}

#[test]
fn configured_weights_flow_into_rankings() {
    let tmp = project_dir();
    config::seed_config(tmp.path()).unwrap();
    let path = tmp.path().join("config").join(CONFIG_FILE);
    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str(
        "\n[weights]\nORB = 1.0\nAST = 1.0\nSTL = 1.0\nBLK = 1.0\nPTS = 1.0\n\
         \"FG%\" = 1.0\n\"3P%\" = 1.0\n\"FT%\" = 1.0\nTOV = 1.0\n",
    );
    fs::write(&path, text).unwrap();
    let config = config::load_config_from(tmp.path()).unwrap();

    let summary = runner::run(&config, std::io::sink()).unwrap();
    // Unit weights sum the nine unit-normalized features instead of averaging
    let top = &summary.rankings[0].entries[0];
    assert_eq!(top.player, "Alpha");
    assert!((top.score - 9.0).abs() < 1e-9);
}
