use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::preprocess::CleanTable;
use crate::report::mean_by_date;
use crate::temporal::TimeSeries;
use crate::vis::{plot_date_lines, DateSeries, PlotSettings};

pub const NATIONAL_TREND_FILE: &str = "national_trend.png";

/// Mean rate over all regions for each date
pub fn national_series(table: &CleanTable) -> Result<TimeSeries> {
    mean_by_date(table.observations(), Some("national".to_string()))
}

/// Render the national average line chart and return the series
pub fn national_trend(table: &CleanTable, config: &Config) -> Result<TimeSeries> {
    let national = national_series(table)?;

    let settings = PlotSettings::new(
        "National average unemployment rate (monthly)",
        "Date",
        "Unemployment rate (%)",
    )
    .with_size(1200, 500);
    let path = config.output_path(NATIONAL_TREND_FILE);
    plot_date_lines(
        &[DateSeries::new("national", national.points())],
        &path,
        &settings,
    )?;

    info!("national trend over {} dates -> {}", national.len(), path.display());
    Ok(national)
}
