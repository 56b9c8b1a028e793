//! Plotters rendering of the report charts
//!
//! All charts are PNG files drawn through the bitmap backend. Dates are
//! placed on an `f64` axis as days from the common era and labelled back as
//! `YYYY-MM`.

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use std::path::Path;

use crate::error::{Error, Result};
use crate::na::NA;
use crate::pivot::RegionMonthPivot;
use crate::time_series::DecompositionResult;

/// Chart settings shared by every plot
#[derive(Debug, Clone)]
pub struct PlotSettings {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    pub show_legend: bool,
    pub show_grid: bool,
    pub color_palette: Vec<(u8, u8, u8)>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            title: "Plot".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            width: 800,
            height: 600,
            show_legend: true,
            show_grid: true,
            color_palette: vec![
                (0, 123, 255),  // blue
                (255, 99, 71),  // red
                (46, 204, 113), // green
                (255, 193, 7),  // yellow
                (142, 68, 173), // purple
                (52, 152, 219), // light blue
                (243, 156, 18), // orange
                (211, 84, 0),   // brown
            ],
        }
    }
}

impl PlotSettings {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        PlotSettings {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            ..PlotSettings::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn color(&self, index: usize) -> RGBColor {
        if self.color_palette.is_empty() {
            return BLUE;
        }
        let (r, g, b) = self.color_palette[index % self.color_palette.len()];
        RGBColor(r, g, b)
    }
}

/// A named line of dated values
#[derive(Debug, Clone)]
pub struct DateSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl DateSeries {
    pub fn new(name: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        DateSeries {
            name: name.into(),
            points,
        }
    }
}

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_date_label(v: &f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Min and max of finite values, widened when they coincide
fn finite_bounds<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return None;
    }
    if lo == hi {
        return Some((lo - 1.0, hi + 1.0));
    }
    Some((lo, hi))
}

fn with_margin((lo, hi): (f64, f64)) -> std::ops::Range<f64> {
    let margin = (hi - lo) * 0.05;
    (lo - margin)..(hi + margin)
}

/// Every line is keyed by name, a single line included
fn draws_legend(series: &[DateSeries], settings: &PlotSettings) -> bool {
    settings.show_legend && !series.is_empty()
}

/// Line chart of one or more dated series
pub fn plot_date_lines<P: AsRef<Path>>(
    series: &[DateSeries],
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    let x_bounds = finite_bounds(
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(d, _)| date_to_x(d))),
    );
    let y_bounds = finite_bounds(series.iter().flat_map(|s| s.points.iter().map(|&(_, v)| v)));
    let (x_bounds, y_bounds) = match (x_bounds, y_bounds) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(Error::Empty("no points to plot".to_string())),
    };

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&settings.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(with_margin(x_bounds), with_margin(y_bounds))?;

    let y_fmt = |v: &f64| format!("{:.1}", v);
    let mut mesh = chart.configure_mesh();
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_labels(10)
        .y_labels(10)
        .x_label_formatter(&format_date_label)
        .y_label_formatter(&y_fmt)
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    for (i, s) in series.iter().enumerate() {
        let color = settings.color(i);
        let points: Vec<(f64, f64)> = s
            .points
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|&(d, v)| (date_to_x(d), v))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(s.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if draws_legend(series, settings) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Equal-width bins over `[min, max]`
///
/// Returns the left edge, the bin width and the counts. The maximum falls in
/// the last bin. When all values are equal the range is widened to
/// `value ± 0.5`.
pub fn histogram_bins(data: &[f64], bins: usize) -> Result<(f64, f64, Vec<usize>)> {
    if bins == 0 {
        return Err(Error::InvalidInput("bin count must be at least 1".to_string()));
    }
    let finite: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(Error::Empty("no values to bin".to_string()));
    }

    let mut min_value = finite.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max_value = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min_value == max_value {
        min_value -= 0.5;
        max_value += 0.5;
    }
    let bin_width = (max_value - min_value) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in finite {
        let index = ((value - min_value) / bin_width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }
    Ok((min_value, bin_width, counts))
}

/// Histogram of `data` with `bins` equal-width bins
pub fn plot_histogram<P: AsRef<Path>>(
    data: &[f64],
    bins: usize,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    let (min_value, bin_width, counts) = histogram_bins(data, bins)?;
    let max_value = min_value + bin_width * bins as f64;
    let max_count = counts.iter().copied().max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&settings.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (min_value - bin_width * 0.5)..(max_value + bin_width * 0.5),
            0.0..(max_count * 1.1).max(1.0),
        )?;

    let x_fmt = |v: &f64| format!("{:.1}", v);
    let y_fmt = |v: &f64| format!("{:.0}", v);
    let mut mesh = chart.configure_mesh();
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_labels(10)
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    let color = settings.color(0);
    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = min_value + i as f64 * bin_width;
        let x1 = x0 + bin_width;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], color.filled())
    }))?;
    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        let x0 = min_value + i as f64 * bin_width;
        let x1 = x0 + bin_width;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], BLACK.stroke_width(1))
    }))?;

    root.present()?;
    Ok(())
}

/// Vertical bars, one per labelled category
pub fn plot_bars<P: AsRef<Path>>(
    bars: &[(String, f64)],
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    if bars.is_empty() {
        return Err(Error::Empty("no bars to plot".to_string()));
    }
    let (_, y_max) = finite_bounds(bars.iter().map(|&(_, v)| v).chain(std::iter::once(0.0)))
        .unwrap_or((0.0, 1.0));
    let y_min = bars
        .iter()
        .map(|&(_, v)| v)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::min);

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&settings.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..(bars.len() as f64 - 0.5), y_min..(y_max * 1.1))?;

    let label_for = |v: &f64| -> String {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        bars.get(i as usize).map(|(l, _)| l.clone()).unwrap_or_default()
    };

    let y_fmt = |v: &f64| format!("{:.1}", v);
    let mut mesh = chart.configure_mesh();
    if !settings.show_grid {
        mesh.disable_mesh();
    }
    mesh.disable_x_mesh()
        .x_labels(bars.len())
        .y_labels(10)
        .x_label_formatter(&label_for)
        .y_label_formatter(&y_fmt)
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().filter(|(_, (_, v))| v.is_finite()).map(
        |(i, &(_, v))| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], settings.color(i).filled())
        },
    ))?;

    root.present()?;
    Ok(())
}

const ROCKET: [(f64, (u8, u8, u8)); 5] = [
    (0.0, (3, 5, 26)),
    (0.25, (95, 24, 85)),
    (0.5, (203, 27, 79)),
    (0.75, (243, 118, 81)),
    (1.0, (250, 235, 221)),
];

/// Colour of `t` in `[0, 1]` on a dark-to-light red ramp
pub fn rocket_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    for pair in ROCKET.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(lerp(c0.0, c1.0), lerp(c0.1, c1.1), lerp(c0.2, c1.2));
        }
    }
    let (_, c) = ROCKET[ROCKET.len() - 1];
    RGBColor(c.0, c.1, c.2)
}

/// Heatmap of a region × month pivot with a colour bar
///
/// Rows are drawn top to bottom in pivot order. NA cells stay blank.
pub fn plot_heatmap<P: AsRef<Path>>(
    pivot: &RegionMonthPivot,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    if pivot.is_empty() {
        return Err(Error::Empty("heatmap has no rows".to_string()));
    }
    let (lo, hi) = match pivot.value_range() {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    };
    let rows = pivot.len();

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let bar_width = (settings.width / 10).max(60);
    let (main_area, bar_area) =
        root.split_horizontally(settings.width.saturating_sub(bar_width) as i32);

    let mut chart = ChartBuilder::on(&main_area)
        .caption(&settings.title, ("sans-serif", 22).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(140)
        .build_cartesian_2d(0.5..12.5, -0.5..(rows as f64 - 0.5))?;

    let regions = pivot.regions();
    let region_label = |v: &f64| -> String {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 || i as usize >= rows {
            return String::new();
        }
        regions[rows - 1 - i as usize].clone()
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(12)
        .y_labels(rows)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&region_label)
        .x_desc(&settings.x_label)
        .y_desc(&settings.y_label)
        .draw()?;

    let mut cells = Vec::new();
    for (row, (_, months)) in pivot.rows().enumerate() {
        let y = (rows - 1 - row) as f64;
        for (m, cell) in months.iter().enumerate() {
            if let NA::Value(v) = cell {
                let x = (m + 1) as f64;
                let color = rocket_color((v - lo) / (hi - lo));
                cells.push(Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    color.filled(),
                ));
                cells.push(Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    WHITE.stroke_width(1),
                ));
            }
        }
    }
    chart.draw_series(cells)?;

    let mut bar = ChartBuilder::on(&bar_area)
        .margin_top(50)
        .margin_bottom(50)
        .margin_right(10)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;
    let steps = 100;
    let step = (hi - lo) / steps as f64;
    bar.draw_series((0..steps).map(|i| {
        let y0 = lo + i as f64 * step;
        Rectangle::new(
            [(0.0, y0), (1.0, y0 + step)],
            rocket_color(i as f64 / (steps - 1) as f64).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Four stacked panels: observed, trend, seasonal and residual
pub fn plot_decomposition<P: AsRef<Path>>(
    result: &DecompositionResult,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    if result.timestamps.is_empty() {
        return Err(Error::Empty("decomposition has no points".to_string()));
    }
    let xs: Vec<f64> = result.timestamps.iter().map(|&d| date_to_x(d)).collect();
    let x_range = finite_bounds(xs.iter().copied())
        .map(with_margin)
        .ok_or_else(|| Error::Empty("decomposition has no points".to_string()))?;

    let root = BitMapBackend::new(path.as_ref(), (settings.width, settings.height))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(&settings.title, ("sans-serif", 24))?;

    let panels: [(&str, &[f64]); 4] = [
        ("Observed", result.observed.as_slice()),
        ("Trend", result.trend.as_slice()),
        ("Seasonal", result.seasonal.as_slice()),
        ("Resid", result.resid.as_slice()),
    ];
    let areas = root.split_evenly((4, 1));

    for (i, ((name, values), area)) in panels.iter().zip(areas.iter()).enumerate() {
        // residuals are drawn against a zero baseline
        let baseline = if i == 3 { Some(0.0) } else { None };
        let y_range = finite_bounds(values.iter().copied().chain(baseline))
            .map(with_margin)
            .unwrap_or(-1.0..1.0);

        let mut chart = ChartBuilder::on(area)
            .margin(5)
            .x_label_area_size(if i == 3 { 30 } else { 10 })
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .y_labels(4)
            .x_label_formatter(&format_date_label)
            .y_label_formatter(&|v| format!("{:.2}", v))
            .y_desc(*name)
            .draw()?;

        let color = settings.color(0);
        let points: Vec<(f64, f64)> = xs.iter().copied().zip(values.iter().copied()).collect();
        if i == 3 {
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 3, color.filled())),
            )?;
            chart.draw_series(LineSeries::new(
                vec![(x_range.start, 0.0), (x_range.end, 0.0)],
                BLACK,
            ))?;
        } else {
            chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
        }
    }

    root.present()?;
    Ok(())
}
