//! Figure model for the metrics grid
//!
//! Everything that decides *what* gets drawn lives here: panel placement,
//! bar offsets and colors, legend entries and axis ranges. [`super::viz`]
//! only turns a finished [`Figure`] into pixels.

use super::palette::Palette;
use super::types::{GRID_COLS, GRID_ROWS, Metric, Results};
use crate::error::{Error, Result};
use plotters::style::RGBColor;
use std::ops::Range;
use tracing::debug;

pub const BAR_WIDTH: f64 = 0.45;
pub const DEFAULT_TITLE: &str = "Performance Metrics for Three Supervised Learning Models";
pub const LEGEND_COLUMNS: usize = 3;

/// Headroom added above the tallest bar.
const Y_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub title: String,
    pub bar_width: f64,
    pub legend_columns: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            bar_width: BAR_WIDTH,
            legend_columns: LEGEND_COLUMNS,
        }
    }
}

/// One bar, centered on `offset` in panel data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub learner: String,
    pub offset: f64,
    pub width: f64,
    pub height: f64,
    pub color: RGBColor,
}

impl Bar {
    pub fn left(&self) -> f64 {
        self.offset - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.offset + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub row: usize,
    pub col: usize,
    pub metric: Metric,
    bars: Vec<Bar>,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        self.metric.title()
    }

    pub fn y_label(&self) -> &'static str {
        self.metric.y_label()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Value range covering every bar, always including zero.
    pub fn y_range(&self) -> Range<f64> {
        let (lo, hi) = self
            .bars
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), bar| {
                (lo.min(bar.height), hi.max(bar.height))
            });
        let lo = if lo < 0.0 { lo * (1.0 + Y_MARGIN) } else { lo };
        let hi = if hi > 0.0 { hi * (1.0 + Y_MARGIN) } else { hi };
        if hi - lo <= f64::EPSILON {
            return 0.0..1.0;
        }
        lo..hi
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub bar_width: f64,
    pub legend_columns: usize,
    learner_count: usize,
    panels: Vec<Panel>,
    legend: Vec<LegendEntry>,
}

impl Figure {
    /// Panels in row-major order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, row: usize, col: usize) -> Result<&Panel> {
        if row >= GRID_ROWS || col >= GRID_COLS {
            return Err(Error::PanelOutOfRange { row, col });
        }
        Ok(&self.panels[row * GRID_COLS + col])
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    pub fn learner_count(&self) -> usize {
        self.learner_count
    }

    /// `(rows, cols)` of the legend block; never more columns than entries.
    pub fn legend_grid(&self) -> (usize, usize) {
        let cols = self.legend_columns.min(self.legend.len()).max(1);
        (self.legend.len().div_ceil(cols).max(1), cols)
    }

    /// Shared x range: `bar_width / 2` padding on both sides of the bars.
    pub fn x_range(&self) -> Range<f64> {
        let last = self.learner_count.saturating_sub(1) as f64;
        0.0..last + 2.0 * self.bar_width
    }
}

pub fn build_figure(results: &Results, palette: &Palette) -> Result<Figure> {
    build_figure_with(results, palette, &LayoutOptions::default())
}

pub fn build_figure_with(
    results: &Results,
    palette: &Palette,
    options: &LayoutOptions,
) -> Result<Figure> {
    if results.is_empty() {
        return Err(Error::EmptyResults);
    }
    if !(options.bar_width.is_finite() && options.bar_width > 0.0) {
        return Err(Error::ConfigurationError(format!(
            "bar width must be positive, got {}",
            options.bar_width
        )));
    }
    if options.legend_columns == 0 {
        return Err(Error::ConfigurationError(
            "legend needs at least one column".to_string(),
        ));
    }
    palette.ensure_capacity(results.len())?;

    let mut panels: Vec<Panel> = Metric::ALL
        .iter()
        .map(|&metric| {
            let (row, col) = metric.grid_position();
            Panel {
                row,
                col,
                metric,
                bars: Vec::with_capacity(results.len()),
            }
        })
        .collect();

    let mut legend = Vec::with_capacity(results.len());
    for (k, learner) in results.iter().enumerate() {
        let color = palette.get(k).ok_or_else(|| Error::PaletteExhausted {
            learners: results.len(),
            colors: palette.len(),
        })?;

        for (j, (_, value)) in learner.metrics.iter().enumerate() {
            panels[j].bars.push(Bar {
                learner: learner.name.clone(),
                offset: k as f64 + options.bar_width,
                width: options.bar_width,
                height: value,
                color,
            });
        }

        legend.push(LegendEntry {
            label: learner.name.clone(),
            color,
        });
    }

    debug!(
        "Laid out {} panels for learners {:?}",
        panels.len(),
        results.names()
    );

    Ok(Figure {
        title: options.title.clone(),
        bar_width: options.bar_width,
        legend_columns: options.legend_columns,
        learner_count: results.len(),
        panels,
        legend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf::types::MetricSet;

    fn metrics(base: f64) -> MetricSet {
        MetricSet {
            train_time: base,
            rmse_train: base + 1.0,
            mae_train: base + 0.5,
            pred_time: base / 10.0,
            rmse_test: base + 1.5,
            mae_test: base + 0.8,
        }
    }

    fn results(n: usize) -> Results {
        let mut results = Results::new();
        for k in 0..n {
            results
                .push(format!("learner-{}", k), metrics(k as f64 + 1.0))
                .unwrap();
        }
        results
    }

    #[test]
    fn test_bar_offsets_and_colors() {
        let palette = Palette::default();
        let figure = build_figure(&results(3), &palette).unwrap();

        for panel in figure.panels() {
            for (k, bar) in panel.bars().iter().enumerate() {
                assert_eq!(bar.offset, k as f64 + BAR_WIDTH);
                assert_eq!(bar.width, BAR_WIDTH);
                assert_eq!(Some(bar.color), palette.get(k));
            }
        }
    }

    #[test]
    fn test_bar_heights_follow_metric() {
        let figure = build_figure(&results(2), &Palette::default()).unwrap();
        let pred = figure.panel(1, 0).unwrap();
        assert_eq!(pred.metric, Metric::PredTime);
        assert_eq!(pred.bars()[0].height, 0.1);
        assert_eq!(pred.bars()[1].height, 0.2);
        assert_eq!(pred.bars()[1].learner, "learner-1");
    }

    #[test]
    fn test_panel_out_of_range() {
        let figure = build_figure(&results(1), &Palette::default()).unwrap();
        assert_eq!(
            figure.panel(2, 0).unwrap_err(),
            Error::PanelOutOfRange { row: 2, col: 0 }
        );
        assert!(figure.panel(0, 3).is_err());
    }

    #[test]
    fn test_x_range_is_symmetric() {
        for n in 1..=3 {
            let figure = build_figure(&results(n), &Palette::default()).unwrap();
            let range = figure.x_range();
            let bars = figure.panels()[0].bars();
            let left_pad = bars[0].left() - range.start;
            let right_pad = range.end - bars[n - 1].right();
            assert!((left_pad - right_pad).abs() < 1e-12);
            assert!((left_pad - BAR_WIDTH / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_y_range() {
        let mut zero = Results::new();
        zero.push("flat", MetricSet::default()).unwrap();
        let figure = build_figure(&zero, &Palette::default()).unwrap();
        assert_eq!(figure.panels()[0].y_range(), 0.0..1.0);

        let figure = build_figure(&results(2), &Palette::default()).unwrap();
        let range = figure.panel(0, 0).unwrap().y_range();
        assert_eq!(range.start, 0.0);
        assert!((range.end - 2.0 * 1.05).abs() < 1e-12);

        let mut negative = Results::new();
        let mut m = metrics(1.0);
        m.rmse_train = -2.0;
        negative.push("neg", m).unwrap();
        let figure = build_figure(&negative, &Palette::default()).unwrap();
        let range = figure.panel(0, 1).unwrap().y_range();
        assert!(range.start < -2.0);
        assert_eq!(range.end, 0.0);
    }

    #[test]
    fn test_legend_grid() {
        let figure = build_figure(&results(2), &Palette::default()).unwrap();
        assert_eq!(figure.legend_grid(), (1, 2));

        let palette = Palette::from_hex(&["#000000"; 5]).unwrap();
        let figure = build_figure(&results(5), &palette).unwrap();
        assert_eq!(figure.legend_grid(), (2, 3));
    }

    #[test]
    fn test_invalid_options() {
        let options = LayoutOptions {
            bar_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            build_figure_with(&results(1), &Palette::default(), &options),
            Err(Error::ConfigurationError(_))
        ));

        let options = LayoutOptions {
            legend_columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            build_figure_with(&results(1), &Palette::default(), &options),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(
            build_figure(&Results::new(), &Palette::default()).unwrap_err(),
            Error::EmptyResults
        );
    }
}
