//! Pre-disruption versus disruption-period comparison per region

use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::groupby::group_mean;
use crate::io::{read_raw_csv, write_table};
use crate::na::{present_values, NA};
use crate::preprocess::{CleanTable, Observation};
use crate::stats;
use crate::vis::{plot_histogram, PlotSettings};

pub const IMPACT_TABLE_FILE: &str = "covid_impact_by_region.csv";
pub const IMPACT_HISTOGRAM_FILE: &str = "covid_change_distribution.png";
pub const IMPACT_HEADER: [&str; 4] = ["Region", "pre_mean", "covid_mean", "abs_change"];

/// Mean rates of one region before and during the disruption window
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactRow {
    pub region: String,
    pub pre_mean: NA<f64>,
    pub covid_mean: NA<f64>,
    /// `covid_mean - pre_mean`, NA when either side is
    pub abs_change: NA<f64>,
}

impl ImpactRow {
    pub fn new(region: impl Into<String>, pre_mean: NA<f64>, covid_mean: NA<f64>) -> Self {
        let abs_change = match (pre_mean, covid_mean) {
            (NA::Value(pre), NA::Value(covid)) => NA::from_f64(covid - pre),
            _ => NA::NA,
        };
        ImpactRow {
            region: region.into(),
            pre_mean,
            covid_mean,
            abs_change,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSummary {
    pub mean_abs_change: NA<f64>,
    pub median_abs_change: NA<f64>,
    pub regions_most_affected: Vec<String>,
    pub regions_least_affected: Vec<String>,
}

impl ImpactSummary {
    /// Summary of an already sorted impact table
    pub fn from_rows(rows: &[ImpactRow], n: usize) -> Self {
        let changes: Vec<NA<f64>> = rows.iter().map(|r| r.abs_change).collect();
        ImpactSummary {
            mean_abs_change: stats::mean(&changes),
            median_abs_change: stats::median(&changes),
            regions_most_affected: rows.iter().take(n).map(|r| r.region.clone()).collect(),
            regions_least_affected: rows[rows.len().saturating_sub(n)..]
                .iter()
                .map(|r| r.region.clone())
                .collect(),
        }
    }

    /// `(key, value)` pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mean_abs_change", format_value(self.mean_abs_change)),
            ("median_abs_change", format_value(self.median_abs_change)),
            (
                "regions_most_affected",
                format!("{:?}", self.regions_most_affected),
            ),
            (
                "regions_least_affected",
                format!("{:?}", self.regions_least_affected),
            ),
        ]
    }
}

impl fmt::Display for ImpactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{} : {}", key, value)?;
        }
        Ok(())
    }
}

fn format_value(value: NA<f64>) -> String {
    match value {
        NA::Value(v) => format!("{:?}", v),
        NA::NA => "nan".to_string(),
    }
}

fn window_means<'a, I>(observations: I) -> Result<BTreeMap<String, f64>>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let (regions, rates): (Vec<String>, Vec<f64>) = observations
        .into_iter()
        .map(|o| (o.region.clone(), o.rate))
        .unzip();
    group_mean(regions, &rates)
}

/// Per-region comparison of the pre and during windows, sorted
///
/// Regions seen in either window are included.
pub fn compute_impact(table: &CleanTable, config: &Config) -> Result<Vec<ImpactRow>> {
    let obs = table.observations();
    let pre = window_means(obs.iter().filter(|o| o.date <= config.pre_end))?;
    let during = window_means(
        obs.iter()
            .filter(|o| o.date >= config.during_start && o.date <= config.during_end),
    )?;

    let regions: BTreeSet<&String> = pre.keys().chain(during.keys()).collect();
    let mut rows: Vec<ImpactRow> = regions
        .into_iter()
        .map(|region| {
            ImpactRow::new(
                region.clone(),
                pre.get(region).map(|&v| NA::from_f64(v)).unwrap_or(NA::NA),
                during.get(region).map(|&v| NA::from_f64(v)).unwrap_or(NA::NA),
            )
        })
        .collect();

    sort_impact(&mut rows);
    Ok(rows)
}

/// Largest change first, NA last; the sort is stable
pub fn sort_impact(rows: &mut [ImpactRow]) {
    rows.sort_by(|a, b| a.abs_change.cmp_desc_na_last(&b.abs_change));
}

pub fn write_impact_csv<P: AsRef<Path>>(path: P, rows: &[ImpactRow]) -> Result<()> {
    write_table(
        path,
        &IMPACT_HEADER,
        rows.iter().map(|r| {
            vec![
                r.region.clone(),
                csv_value(r.pre_mean),
                csv_value(r.covid_mean),
                csv_value(r.abs_change),
            ]
        }),
    )
}

fn csv_value(value: NA<f64>) -> String {
    match value {
        NA::Value(v) => format!("{:?}", v),
        NA::NA => String::new(),
    }
}

/// Load a table written by [`write_impact_csv`]
pub fn read_impact_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ImpactRow>> {
    let df = read_raw_csv(path)?;
    let regions = df.column(IMPACT_HEADER[0])?;
    let parse = |name: &str| -> Result<Vec<NA<f64>>> {
        df.column(name)?
            .iter()
            .map(|cell| match cell {
                NA::Value(s) => s.trim().parse::<f64>().map(NA::from_f64).map_err(|e| {
                    Error::InvalidInput(format!("{} value '{}': {}", name, s, e))
                }),
                NA::NA => Ok(NA::NA),
            })
            .collect()
    };
    let pre = parse(IMPACT_HEADER[1])?;
    let covid = parse(IMPACT_HEADER[2])?;
    let change = parse(IMPACT_HEADER[3])?;

    Ok(regions
        .iter()
        .zip(pre)
        .zip(covid)
        .zip(change)
        .map(|(((region, pre_mean), covid_mean), abs_change)| ImpactRow {
            region: region
                .value()
                .cloned()
                .unwrap_or_else(|| crate::preprocess::MISSING_REGION.to_string()),
            pre_mean,
            covid_mean,
            abs_change,
        })
        .collect())
}

/// Compute, persist and chart the impact table
pub fn covid_impact(table: &CleanTable, config: &Config) -> Result<(Vec<ImpactRow>, ImpactSummary)> {
    let rows = compute_impact(table, config)?;

    let table_path = config.output_path(IMPACT_TABLE_FILE);
    write_impact_csv(&table_path, &rows)?;
    info!("impact table with {} regions -> {}", rows.len(), table_path.display());

    let changes = present_values(&rows.iter().map(|r| r.abs_change).collect::<Vec<_>>());
    if changes.is_empty() {
        debug!("no region has both windows, skipping change histogram");
    } else {
        let settings = PlotSettings::new(
            "Distribution of change in unemployment rate (COVID period vs pre-COVID)",
            "Change in unemployment rate (pp)",
            "Count",
        )
        .with_size(1000, 500);
        plot_histogram(
            &changes,
            config.histogram_bins,
            config.output_path(IMPACT_HISTOGRAM_FILE),
            &settings,
        )?;
    }

    let summary = ImpactSummary::from_rows(&rows, config.summary_regions);
    Ok((rows, summary))
}
