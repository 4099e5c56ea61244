// Feature histograms: equal-width bin counts drawn as text bar charts.
//
// The chart is rendered into an off-screen ratatui buffer and dumped row by
// row, so the files can be read in any pager.

use std::path::{Path, PathBuf};

use courtrank_core::features::Feature;
use courtrank_core::table::FeatureTable;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{BarChart, Block, Widget};
use tracing::info;

use crate::config::HistogramConfig;
use crate::report::EmitError;

const BAR_WIDTH: u16 = 3;
const BAR_GAP: u16 = 1;
const CHART_HEIGHT: u16 = 16;

/// Most bins a chart can have and still fit on a wide terminal line.
pub const MAX_BINS: usize = 200;

/// Bin counts for one feature column.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub feature: Feature,
    /// Lower edge of the first bin.
    pub lower: f64,
    /// Upper edge of the last bin.
    pub upper: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Count `values` into `bins` equal-width bins spanning their range. The
    /// last bin is closed on the right. A constant column is centred in a
    /// unit-wide range. `bins` is clamped to `1..=MAX_BINS`.
    pub fn from_values(feature: Feature, values: &[f64], bins: usize) -> Histogram {
        let bins = bins.clamp(1, MAX_BINS);
        let mut counts = vec![0u64; bins];
        let finite = values.iter().copied().filter(|v| v.is_finite());

        let (mut lower, mut upper) = finite
            .clone()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lower > upper {
            return Histogram {
                feature,
                lower: 0.0,
                upper: 0.0,
                counts,
            };
        }
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let width = (upper - lower) / bins as f64;
        for v in finite {
            let idx = (((v - lower) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram {
            feature,
            lower,
            upper,
            counts,
        }
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bar chart plus a footer with the value range.
    pub fn render(&self) -> String {
        let width = u16::try_from(self.counts.len())
            .ok()
            .and_then(|bins| bins.checked_mul(BAR_WIDTH + BAR_GAP))
            .and_then(|bars| bars.checked_add(2 - BAR_GAP))
            .unwrap_or(u16::MAX);
        let area = Rect::new(0, 0, width, CHART_HEIGHT);
        let mut buf = Buffer::empty(area);

        let labels: Vec<String> = (1..=self.counts.len()).map(|i| i.to_string()).collect();
        let data: Vec<(&str, u64)> = labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
            .collect();
        let title = format!(" {} ", self.feature.column_name());

        BarChart::default()
            .block(Block::bordered().title(title))
            .bar_width(BAR_WIDTH)
            .bar_gap(BAR_GAP)
            .data(data.as_slice())
            .render(area, &mut buf);

        let mut out = buffer_lines(&buf).join("\n");
        out.push('\n');
        out.push_str(&format!(
            "range {:.6} .. {:.6}, bin width {:.6}, {} players\n",
            self.lower,
            self.upper,
            self.bin_width(),
            self.total()
        ));
        out
    }
}

fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}

/// Path of the chart for `feature` under `dir`.
pub fn histogram_path(dir: &Path, feature: Feature) -> PathBuf {
    dir.join(format!("{}.txt", feature.file_stem()))
}

/// Write one chart per feature. Returns the written paths.
pub fn write_histograms(
    table: &FeatureTable,
    features: &[Feature],
    config: &HistogramConfig,
) -> Result<Vec<PathBuf>, EmitError> {
    std::fs::create_dir_all(&config.dir).map_err(|e| EmitError::Io {
        path: config.dir.clone(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(features.len());
    for &feature in features {
        let values = table.column(feature)?;
        let chart = Histogram::from_values(feature, values, config.bins).render();
        let path = histogram_path(&config.dir, feature);
        std::fs::write(&path, chart).map_err(|e| EmitError::Io {
            path: path.clone(),
            source: e,
        })?;
        written.push(path);
    }
    info!(
        "wrote {} histograms to {}",
        written.len(),
        config.dir.display()
    );
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
