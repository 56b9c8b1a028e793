use chrono::Datelike;
use log::info;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::Result;
use crate::groupby::group_mean;
use crate::pivot::RegionMonthPivot;
use crate::preprocess::CleanTable;
use crate::vis::{plot_bars, plot_heatmap, PlotSettings};

pub const SEASONALITY_FILE: &str = "seasonality_by_month.png";
pub const HEATMAP_FILE: &str = "heatmap_region_month.png";

/// Mean rate per calendar month over every year and region
///
/// Only months with at least one observation appear.
pub fn monthly_means(table: &CleanTable) -> Result<BTreeMap<u32, f64>> {
    let (months, rates): (Vec<u32>, Vec<f64>) = table
        .observations()
        .iter()
        .map(|o| (o.date.month(), o.rate))
        .unzip();
    group_mean(months, &rates)
}

/// Render the month bar chart and the region × month heatmap
pub fn seasonality_analysis(
    table: &CleanTable,
    config: &Config,
) -> Result<(BTreeMap<u32, f64>, RegionMonthPivot)> {
    let monthly = monthly_means(table)?;
    let bars: Vec<(String, f64)> = monthly
        .iter()
        .map(|(month, mean)| (month.to_string(), *mean))
        .collect();
    let settings = PlotSettings::new(
        "Average unemployment rate by month (all years)",
        "Month",
        "Unemployment rate (%)",
    )
    .with_size(800, 400);
    plot_bars(&bars, config.output_path(SEASONALITY_FILE), &settings)?;

    let pivot =
        RegionMonthPivot::build(table).restrict_to_most_complete(config.heatmap_regions);
    let settings = PlotSettings::new(
        format!(
            "Average unemployment rate by Region and Month (top {} regions)",
            config.heatmap_regions
        ),
        "Month",
        "Region",
    )
    .with_size(1200, 1000);
    plot_heatmap(&pivot, config.output_path(HEATMAP_FILE), &settings)?;

    info!(
        "seasonality over {} months, heatmap of {} regions",
        monthly.len(),
        pivot.len()
    );
    Ok((monthly, pivot))
}
