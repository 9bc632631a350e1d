use super::layout::{
    BAR_WIDTH, DEFAULT_TITLE, Figure, LEGEND_COLUMNS, LayoutOptions, Panel, build_figure_with,
};
use super::palette::{DEFAULT_PALETTE, Palette};
use super::types::{GRID_COLS, GRID_ROWS, Results};
use crate::error::{Error, Result};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Deserialize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub enabled: bool,
    pub output_dir: String,
    pub file_name: String,
    pub image_size: (u32, u32),
    pub title: String,
    /// `#RRGGBB` codes, one per learner in order.
    pub palette: Vec<String>,
    pub legend_columns: usize,
    pub bar_width: f64,
    pub font_size: f64,
    /// Pixels reserved above the grid for the title and legend.
    pub header_height: u32,
    /// Open the written image in the platform viewer.
    pub show: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: "visualizations".to_string(),
            file_name: "performance_metrics.png".to_string(),
            image_size: (1500, 1000),
            title: DEFAULT_TITLE.to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            legend_columns: LEGEND_COLUMNS,
            bar_width: BAR_WIDTH,
            font_size: 16.0,
            header_height: 110,
            show: true,
        }
    }
}

impl VizConfig {
    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join(&self.file_name)
    }

    pub fn palette(&self) -> Result<Palette> {
        Palette::from_hex(self.palette.as_slice())
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            title: self.title.clone(),
            bar_width: self.bar_width,
            legend_columns: self.legend_columns,
        }
    }
}

/// Lay out `results`, write the chart to [`VizConfig::output_path`] and, if
/// `show` is set, open it. Returns the written path, or `None` when rendering
/// is disabled (the results are still validated).
pub fn show_results(results: &Results, options: &VizConfig) -> Result<Option<PathBuf>> {
    let palette = options.palette()?;
    let figure = build_figure_with(results, &palette, &options.layout_options())?;

    if !options.enabled {
        debug!("Visualization disabled, skipping render");
        return Ok(None);
    }

    let path = options.output_path();
    render_figure(&path, &figure, options)?;
    info!(
        "Performance chart for {} learners saved to {}",
        figure.learner_count(),
        path.display()
    );

    if options.show {
        display(&path);
    }
    Ok(Some(path))
}

/// Hand a written chart to the platform's default viewer. Failures are
/// logged, not returned.
pub fn display(path: &Path) {
    if let Err(e) = open::that_detached(path) {
        warn!("Failed to open {} in viewer: {}", path.display(), e);
    }
}

/// Draw `figure` into `filename`. `.svg` files go through the SVG backend,
/// everything else is rasterized and encoded by `image` from the extension.
pub fn render_figure(filename: &Path, figure: &Figure, options: &VizConfig) -> Result<()> {
    let (width, height) = options.image_size;
    if width == 0 || height == 0 {
        return Err(Error::ConfigurationError(format!(
            "image size must be non-zero, got {}x{}",
            width, height
        )));
    }

    if let Some(parent) = filename.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let is_svg = filename
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(filename, (width, height)).into_drawing_area();
        draw_figure(&root, figure, options).map_err(render_error)?;
        root.present().map_err(render_error)?;
    } else {
        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_figure(&root, figure, options).map_err(render_error)?;
            root.present().map_err(render_error)?;
        }
        image::save_buffer(filename, &buffer, width, height, image::ColorType::Rgb8)
            .map_err(render_error)?;
    }

    Ok(())
}

fn render_error(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure, options: &VizConfig) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (_, height) = root.dim_in_pixel();
    let header_height = options.header_height.min(height / 2) as i32;
    let (header, body) = root.split_vertically(header_height);
    let (title_area, legend_area) = header.split_vertically(header_height * 2 / 5);

    draw_title(&title_area, &figure.title, options)?;
    draw_legend(&legend_area, figure, options)?;

    let cells = body.split_evenly((GRID_ROWS, GRID_COLS));
    for (panel, cell) in figure.panels().iter().zip(cells.iter()) {
        draw_panel(cell, panel, figure.x_range(), options)?;
    }

    Ok(())
}

fn draw_title<DB>(area: &DrawingArea<DB, Shift>, title: &str, options: &VizConfig) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, height) = area.dim_in_pixel();
    let style = ("sans-serif", options.font_size * 1.5)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(title, &style, (width as i32 / 2, height as i32 / 2))?;
    Ok(())
}

fn draw_legend<DB>(area: &DrawingArea<DB, Shift>, figure: &Figure, options: &VizConfig) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (rows, cols) = figure.legend_grid();
    let style = ("sans-serif", options.font_size * 1.25)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let patch_h = options.font_size as i32;
    let patch_w = (options.font_size * 2.0) as i32;
    let gap = patch_h / 2;

    let cells = area.split_evenly((rows, cols));
    for (entry, cell) in figure.legend().iter().zip(cells.iter()) {
        let (width, height) = cell.dim_in_pixel();
        let (text_w, _) = cell.estimate_text_size(&entry.label, &style)?;
        let x0 = (width as i32 - (patch_w + gap + text_w as i32)).max(0) / 2;
        let cy = height as i32 / 2;

        cell.draw(&Rectangle::new(
            [(x0, cy - patch_h / 2), (x0 + patch_w, cy + patch_h / 2)],
            entry.color.filled(),
        ))?;
        cell.draw_text(&entry.label, &style, (x0 + patch_w + gap, cy))?;
    }

    Ok(())
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    x_range: Range<f64>,
    options: &VizConfig,
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart: Chart2d<'_, DB> = ChartBuilder::on(area)
        .caption(panel.title(), ("sans-serif", options.font_size * 1.1).into_font())
        .margin(10)
        .x_label_area_size(10)
        .y_label_area_size((options.font_size * 4.5) as u32)
        .build_cartesian_2d(x_range, panel.y_range())?;

    // No x labels means no bottom ticks either.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(panel.y_label())
        .y_label_style(("sans-serif", options.font_size * 0.8).into_font())
        .axis_desc_style(("sans-serif", options.font_size).into_font())
        .draw()?;

    chart.draw_series(panel.bars().iter().map(|bar| {
        Rectangle::new(
            [(bar.left(), 0.0), (bar.right(), bar.height)],
            bar.color.filled(),
        )
    }))?;

    Ok(())
}
