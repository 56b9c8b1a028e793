use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::groupby::GroupBy;
use crate::preprocess::CleanTable;
use crate::vis::{plot_date_lines, DateSeries, PlotSettings};

pub fn top_states_file_name(n: usize) -> String {
    format!("top_{}_states.png", n)
}

/// Rate of each region's latest row
///
/// Rows are ordered by date with a stable sort, so among rows sharing the
/// latest date the one read last wins.
pub fn latest_rates(table: &CleanTable) -> Result<BTreeMap<String, f64>> {
    let observations = table.observations();
    let mut order: Vec<usize> = (0..observations.len()).collect();
    order.sort_by_key(|&i| observations[i].date);

    let keys: Vec<String> = order
        .iter()
        .map(|&i| observations[i].region.clone())
        .collect();
    let rates: Vec<f64> = order.iter().map(|&i| observations[i].rate).collect();
    Ok(GroupBy::new(keys, &rates)?.last())
}

/// The `n` regions with the highest latest rate, highest first
///
/// Equal rates keep region-name order.
pub fn top_regions(table: &CleanTable, n: usize) -> Result<Vec<(String, f64)>> {
    let mut latest: Vec<(String, f64)> = latest_rates(table)?.into_iter().collect();
    latest.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    latest.truncate(n);
    Ok(latest)
}

/// Render the full history of the top regions, one line each
pub fn top_states_plot(table: &CleanTable, config: &Config) -> Result<(Vec<String>, PathBuf)> {
    let n = config.top_n;
    let selected: Vec<String> = top_regions(table, n)?
        .into_iter()
        .map(|(region, _)| region)
        .collect();

    let series: Vec<DateSeries> = selected
        .iter()
        .map(|region| {
            let mut points: Vec<_> = table
                .region_observations(region)
                .map(|o| (o.date, o.rate))
                .collect();
            points.sort_by_key(|&(date, _)| date);
            DateSeries::new(region.clone(), points)
        })
        .collect();

    let path = config.output_path(&top_states_file_name(n));
    let settings = PlotSettings::new(
        format!("Top {} states by latest unemployment rate", n),
        "Date",
        "Unemployment rate (%)",
    )
    .with_size(1200, 600);
    plot_date_lines(&series, &path, &settings)?;

    info!("top {} regions {:?} -> {}", n, selected, path.display());
    Ok((selected, path))
}
