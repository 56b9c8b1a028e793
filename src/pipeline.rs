//! The fixed reporting run

use log::info;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::loader::load_data;
use crate::na::NA;
use crate::pivot::RegionMonthPivot;
use crate::preprocess::preprocess;
use crate::report::{
    covid_impact, decompose_example, national_trend, seasonality_analysis, top_states_plot,
    ImpactRow, ImpactSummary,
};
use crate::temporal::TimeSeries;

/// Everything a run computed, plus where its files went
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub output_dir: PathBuf,
    pub rows: usize,
    pub national: TimeSeries,
    pub top_regions: Vec<String>,
    pub impact: Vec<ImpactRow>,
    pub summary: ImpactSummary,
    pub monthly: BTreeMap<u32, f64>,
    pub pivot: RegionMonthPivot,
    /// Region and the chart written for it, `None` when skipped
    pub decompositions: Vec<(String, Option<PathBuf>)>,
    pub preview_rows: usize,
}

/// Load, clean and run every reporter in order
pub fn run(config: &Config) -> Result<PipelineReport> {
    fs::create_dir_all(&config.output_dir)?;

    let raw = load_data(config)?;
    let table = preprocess(raw, config)?;
    info!("{} rows after cleaning", table.len());

    let national = national_trend(&table, config)?;
    let (top_regions, _) = top_states_plot(&table, config)?;
    let (impact, summary) = covid_impact(&table, config)?;
    let (monthly, pivot) = seasonality_analysis(&table, config)?;

    let mut decompositions = Vec::with_capacity(config.decomposition_regions.len() + 1);
    for region in std::iter::once(&config.national_label).chain(&config.decomposition_regions) {
        let path = decompose_example(&table, region, config)?;
        decompositions.push((region.clone(), path));
    }

    Ok(PipelineReport {
        output_dir: config.output_dir.clone(),
        rows: table.len(),
        national,
        top_regions,
        impact,
        summary,
        monthly,
        pivot,
        decompositions,
        preview_rows: config.preview_rows,
    })
}

fn cell(value: NA<f64>) -> String {
    match value {
        NA::Value(v) => format!("{:.6}", v),
        NA::NA => "NaN".to_string(),
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved plots to {}", self.output_dir.display())?;

        writeln!(f)?;
        writeln!(f, "COVID impact summary (top {} increased):", self.preview_rows)?;
        let preview = &self.impact[..self.impact.len().min(self.preview_rows)];
        let width = preview
            .iter()
            .map(|r| r.region.len())
            .chain(std::iter::once("Region".len()))
            .max()
            .unwrap_or(0);
        writeln!(
            f,
            "{:<width$}  {:>12}  {:>12}  {:>12}",
            "Region",
            "pre_mean",
            "covid_mean",
            "abs_change",
            width = width
        )?;
        for row in preview {
            writeln!(
                f,
                "{:<width$}  {:>12}  {:>12}  {:>12}",
                row.region,
                cell(row.pre_mean),
                cell(row.covid_mean),
                cell(row.abs_change),
                width = width
            )?;
        }

        writeln!(f)?;
        writeln!(f, "COVID impact summary stats:")?;
        write!(f, "{}", self.summary)
    }
}
