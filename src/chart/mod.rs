//! Progress chart rendering.
//!
//! Draws one line-and-marker series of working weight per exercise,
//! with dates along the x-axis, and writes it out as SVG.

use crate::config::ChartConfig;
use crate::models::{ExerciseSeries, DISPLAY_DATE_FORMAT};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(23, 190, 207),
];

/// Size and labels of the rendered chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub y_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for ChartOptions {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: config.title.clone(),
            y_label: config.y_label.clone(),
        }
    }
}

/// Render the series to an SVG file.
pub fn render_svg(series: &[ExerciseSeries], path: &Path, options: &ChartOptions) -> Result<()> {
    let svg = render_svg_string(series, options)?;
    std::fs::write(path, svg)
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;

    debug!("Chart written to {}", path.display());
    Ok(())
}

/// Render the series to an in-memory SVG document.
pub fn render_svg_string(series: &[ExerciseSeries], options: &ChartOptions) -> Result<String> {
    ensure_drawable(series)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw_chart(&root, series, options)?;
        root.present()?;
    }
    Ok(svg)
}

fn ensure_drawable(series: &[ExerciseSeries]) -> Result<()> {
    if series.iter().all(|s| s.points.is_empty()) {
        bail!("No workout data to chart");
    }
    Ok(())
}

fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &[ExerciseSeries],
    options: &ChartOptions,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (x_min, x_max) = day_range(series);
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.weight))
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 28))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 80)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(options.y_label.as_str())
        .x_labels(10)
        .x_label_formatter(&|x: &f64| format_day(*x))
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .draw()?;

    for (i, exercise) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points: Vec<(f64, f64)> = exercise
            .points
            .iter()
            .map(|p| (day_number(p.date), p.weight))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(exercise.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Day number used as the x coordinate.
fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// X-axis bounds, padded by a day on each side.
fn day_range(series: &[ExerciseSeries]) -> (f64, f64) {
    let days = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| day_number(p.date)));
    let (min, max) = days.fold((f64::MAX, f64::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));
    (min - 1.0, max + 1.0)
}
