// Configuration loading and parsing (courtrank.toml).

use courtrank_core::features::{Feature, FeatureSpec};
use courtrank_core::pipeline::PipelineOptions;
use encoding_rs::Encoding;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::histogram::MAX_BINS;

/// File name under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "courtrank.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub encoding: &'static Encoding,
    pub output: OutputConfig,
    pub histograms: HistogramConfig,
    pub pipeline: PipelineOptions,
}

// ---------------------------------------------------------------------------
// courtrank.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire courtrank.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataSection,
    output: OutputConfig,
    histograms: HistogramConfig,
    pipeline: PipelineSection,
    /// Column name -> weight. Omitted means equal weights.
    #[serde(default)]
    weights: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    input: String,
    encoding: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PipelineSection {
    min_years: f64,
    iqr_multiplier: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub file_prefix: String,
    pub preview_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistogramConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub bins: usize,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/courtrank.toml` relative to
/// `base_dir`. Relative paths inside the file are resolved against
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()`, which seeds the file first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let encoding = Encoding::for_label(file.data.encoding.trim().as_bytes()).ok_or_else(|| {
        ConfigError::ValidationError {
            field: "data.encoding".into(),
            message: format!("unknown encoding label `{}`", file.data.encoding),
        }
    })?;

    let weights = match &file.weights {
        Some(map) => Some(resolve_weights(map, &FeatureSpec::roster())?),
        None => None,
    };

    let mut output = file.output;
    output.dir = base_dir.join(&output.dir);
    let mut histograms = file.histograms;
    histograms.dir = base_dir.join(&histograms.dir);

    let config = Config {
        input: base_dir.join(&file.data.input),
        encoding,
        output,
        histograms,
        pipeline: PipelineOptions {
            min_years: file.pipeline.min_years,
            iqr_multiplier: file.pipeline.iqr_multiplier,
            weights,
        },
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/courtrank.toml` from `defaults/` when it does not exist yet.
/// Returns the written path, or `None` when a config file was already in
/// place. An existing file is never touched.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in config/ or defaults/ under {}; \
                 run courtrank from the project root",
                base_dir.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "failed to copy {} to {}: {e}",
            source.display(),
            target.display()
        ),
    })?;
    info!("seeded {} from {}", target.display(), source.display());

    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding it from
/// `defaults/` on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Turn a `[weights]` table into a vector aligned with `spec.tracked()`.
fn resolve_weights(
    map: &BTreeMap<String, f64>,
    spec: &FeatureSpec,
) -> Result<Vec<f64>, ConfigError> {
    let tracked = spec.tracked();
    for name in map.keys() {
        let known = Feature::from_column_name(name).is_some_and(|f| tracked.contains(&f));
        if !known {
            return Err(ConfigError::ValidationError {
                field: format!("weights.{name}"),
                message: "not a ranked feature".into(),
            });
        }
    }
    tracked
        .iter()
        .map(|feature| {
            let field = format!("weights.{}", feature.column_name());
            match map.get(feature.column_name()) {
                None => Err(ConfigError::ValidationError {
                    field,
                    message: "missing; give every ranked feature a weight or omit [weights]"
                        .into(),
                }),
                Some(&w) if !w.is_finite() || w <= 0.0 => Err(ConfigError::ValidationError {
                    field,
                    message: format!("must be > 0, got {w}"),
                }),
                Some(&w) => Ok(w),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.output.file_prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "output.file_prefix".into(),
            message: "must not be empty".into(),
        });
    }

    if config.histograms.bins > MAX_BINS {
        return Err(ConfigError::ValidationError {
            field: "histograms.bins".into(),
            message: format!("must be <= {MAX_BINS}, got {}", config.histograms.bins),
        });
    }

    let count_fields: &[(&str, usize)] = &[
        ("output.preview_size", config.output.preview_size),
        ("histograms.bins", config.histograms.bins),
    ];
    for (name, val) in count_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    let m = config.pipeline.iqr_multiplier;
    if !m.is_finite() || m < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "pipeline.iqr_multiplier".into(),
            message: format!("must be >= 0, got {m}"),
        });
    }

    let y = config.pipeline.min_years;
    if !y.is_finite() || y < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "pipeline.min_years".into(),
            message: format!("must be >= 0, got {y}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// The shipped defaults file at the workspace root.
    fn defaults_text() -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../defaults")
            .join(CONFIG_FILE);
        fs::read_to_string(path).expect("defaults/courtrank.toml should exist")
    }

    /// A base dir whose config/ holds `text`.
    fn base_with_config(text: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn expect_validation_field(text: &str, expected: &str) {
        let tmp = base_with_config(text);
        let err = load_config_from(tmp.path()).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = base_with_config(&defaults_text());
        let config = load_config_from(tmp.path()).expect("should load valid config");

        assert_eq!(config.input, tmp.path().join("players1.csv"));
        assert_eq!(config.encoding, encoding_rs::WINDOWS_1250);
        assert_eq!(config.output.file_prefix, "ranking_lakers");
        assert_eq!(config.output.preview_size, 5);
        assert!(config.histograms.enabled);
        assert_eq!(config.histograms.bins, 20);
        assert_eq!(
            config.histograms.dir,
            tmp.path().join("plots").join("histograms")
        );
        assert!((config.pipeline.min_years - 1.0).abs() < f64::EPSILON);
        assert!((config.pipeline.iqr_multiplier - 1.5).abs() < f64::EPSILON);
        assert!(config.pipeline.weights.is_none());
    }

    #[test]
    fn weights_table_resolved_in_tracked_order() {
        let text = format!(
            "{}\n[weights]\nORB = 1.0\nAST = 1.0\nSTL = 1.0\nBLK = 1.0\nPTS = 4.0\n\
             \"FG%\" = 1.0\n\"3P%\" = 1.0\n\"FT%\" = 1.0\nTOV = 2.0\n",
            defaults_text()
        );
        let tmp = base_with_config(&text);
        let config = load_config_from(tmp.path()).unwrap();
        let weights = config.pipeline.weights.unwrap();
        assert_eq!(weights.len(), 9);
        assert!((weights[4] - 4.0).abs() < f64::EPSILON);
        assert!((weights[8] - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_unknown_weight_column() {
        let text = format!("{}\n[weights]\nREB = 1.0\n", defaults_text());
        expect_validation_field(&text, "weights.REB");
    }

    #[test]
    fn rejects_incomplete_weights() {
        let text = format!("{}\n[weights]\nORB = 1.0\n", defaults_text());
        expect_validation_field(&text, "weights.AST");
    }

    #[test]
    fn rejects_non_positive_weight() {
        let text = format!(
            "{}\n[weights]\nORB = 0.0\nAST = 1.0\nSTL = 1.0\nBLK = 1.0\nPTS = 1.0\n\
             \"FG%\" = 1.0\n\"3P%\" = 1.0\n\"FT%\" = 1.0\nTOV = 1.0\n",
            defaults_text()
        );
        expect_validation_field(&text, "weights.ORB");
    }

    #[test]
    fn rejects_unknown_encoding() {
        let text = defaults_text().replace("windows-1250", "klingon-8");
        expect_validation_field(&text, "data.encoding");
    }

    #[test]
    fn accepts_cp1250_alias() {
        let text = defaults_text().replace("windows-1250", "cp1250");
        let tmp = base_with_config(&text);
        let config = load_config_from(tmp.path()).unwrap();
        assert_eq!(config.encoding, encoding_rs::WINDOWS_1250);
    }

    #[test]
    fn rejects_zero_preview_size() {
        let text = defaults_text().replace("preview_size = 5", "preview_size = 0");
        expect_validation_field(&text, "output.preview_size");
    }

    #[test]
    fn rejects_zero_bins() {
        let text = defaults_text().replace("bins = 20", "bins = 0");
        expect_validation_field(&text, "histograms.bins");
    }

    #[test]
    fn rejects_negative_iqr_multiplier() {
        let text = defaults_text().replace("iqr_multiplier = 1.5", "iqr_multiplier = -1.0");
        expect_validation_field(&text, "pipeline.iqr_multiplier");
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config_from(tmp.path()).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = base_with_config("this is not valid [[[ toml");
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn rejects_huge_bins() {
        let text = defaults_text().replace("bins = 20", "bins = 20000");
        expect_validation_field(&text, "histograms.bins");

        let text = defaults_text().replace("bins = 20", &format!("bins = {MAX_BINS}"));
        let tmp = base_with_config(&text);
        assert_eq!(load_config_from(tmp.path()).unwrap().histograms.bins, MAX_BINS);
    }

    #[test]
    fn seed_config_copies_default_file_only() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults_dir = tmp.path().join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), defaults_text()).unwrap();
        fs::write(defaults_dir.join("courtrank.toml.example"), "# example\n").unwrap();

        assert!(!tmp.path().join("config").exists());
        let seeded = seed_config(tmp.path()).expect("should succeed");
        let target = tmp.path().join("config").join(CONFIG_FILE);
        assert_eq!(seeded, Some(target.clone()));
        assert_eq!(fs::read_to_string(target).unwrap(), defaults_text());
        assert!(!tmp.path().join("config/courtrank.toml.example").exists());
        assert!(load_config_from(tmp.path()).is_ok());
    }

    #[test]
    fn seed_config_keeps_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let defaults_dir = tmp.path().join("defaults");
        let config_dir = tmp.path().join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), defaults_text()).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), "# custom\n").unwrap();

        assert_eq!(seed_config(tmp.path()).unwrap(), None);
        let content = fs::read_to_string(config_dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");
    }

    #[test]
    fn seed_config_without_config_needs_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        // An empty config/ directory does not count as configured
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        let err = seed_config(tmp.path()).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("run courtrank from the project root"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
    }
}
