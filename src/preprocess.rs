//! Cleaning of the loaded table
//!
//! Turns the raw string table into row-aligned [`Observation`]s: trimmed
//! column names, dates parsed day-first, numeric rates, trimmed regions.
//! Rows without a usable date or rate are dropped.

use chrono::NaiveDate;
use log::debug;

use crate::config::Config;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::na::NA;
use crate::temporal::parse_day_first;

/// Region recorded for rows whose region cell is missing
pub const MISSING_REGION: &str = "nan";

/// One cleaned row
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub region: String,
    pub date: NaiveDate,
    pub rate: f64,
    pub area: Option<String>,
}

/// The cleaned table: every remaining row of the merged input, with its
/// parsed fields alongside
#[derive(Debug, Clone)]
pub struct CleanTable {
    frame: DataFrame,
    observations: Vec<Observation>,
}

impl CleanTable {
    pub fn new(frame: DataFrame, observations: Vec<Observation>) -> Result<Self> {
        if frame.row_count() != observations.len() {
            return Err(Error::Consistency(format!(
                "{} table rows for {} observations",
                frame.row_count(),
                observations.len()
            )));
        }
        Ok(CleanTable {
            frame,
            observations,
        })
    }

    /// Build from observations alone, with Region/Date/rate columns
    pub fn from_observations(observations: Vec<Observation>, config: &Config) -> Result<Self> {
        let mut frame = DataFrame::new();
        frame.add_column(
            config.region_column.as_str(),
            observations
                .iter()
                .map(|o| NA::Value(o.region.clone()))
                .collect(),
        )?;
        frame.add_column(
            config.date_column.as_str(),
            observations
                .iter()
                .map(|o| NA::Value(o.date.format("%Y-%m-%d").to_string()))
                .collect(),
        )?;
        frame.add_column(
            config.rate_column.as_str(),
            observations
                .iter()
                .map(|o| NA::Value(o.rate.to_string()))
                .collect(),
        )?;
        Self::new(frame, observations)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct regions in ascending order
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self
            .observations
            .iter()
            .map(|o| o.region.clone())
            .collect();
        regions.sort();
        regions.dedup();
        regions
    }

    /// Observations of one region, in input order
    pub fn region_observations<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Observation> + 'a {
        self.observations.iter().filter(move |o| o.region == region)
    }
}

/// Clean the merged raw table
///
/// Missing date, rate or region columns are fatal (`MissingColumn`), as is
/// a table where no row survives (`Empty`).
pub fn preprocess(mut df: DataFrame, config: &Config) -> Result<CleanTable> {
    df.rename_columns(|c| c.trim().to_string())?;

    let duplicate_region = format!("{}.1", config.region_column);
    if !df.contains_column(&config.region_column) && df.contains_column(&duplicate_region) {
        df.rename_column(&duplicate_region, &config.region_column)?;
    }

    let dates: Vec<Option<NaiveDate>> = df
        .column(&config.date_column)?
        .iter()
        .map(|cell| cell.value().and_then(|s| parse_day_first(s)))
        .collect();
    let rates: Vec<Option<f64>> = df
        .column(&config.rate_column)?
        .iter()
        .map(|cell| cell.value().and_then(|s| parse_rate(s)))
        .collect();
    let regions: Vec<String> = df
        .column(&config.region_column)?
        .iter()
        .map(|cell| match cell {
            NA::Value(s) => s.trim().to_string(),
            NA::NA => MISSING_REGION.to_string(),
        })
        .collect();
    let areas: Vec<Option<String>> = match df.get_column(&config.area_column) {
        Some(cells) => cells
            .iter()
            .map(|cell| cell.value().map(|s| s.trim().to_string()))
            .collect(),
        None => vec![None; df.row_count()],
    };

    let mask: Vec<bool> = dates
        .iter()
        .zip(&rates)
        .map(|(d, r)| d.is_some() && r.is_some())
        .collect();

    let observations: Vec<Observation> = dates
        .into_iter()
        .zip(rates)
        .zip(regions.iter())
        .zip(areas)
        .filter_map(|(((date, rate), region), area)| {
            Some(Observation {
                region: region.clone(),
                date: date?,
                rate: rate?,
                area,
            })
        })
        .collect();

    if observations.is_empty() {
        return Err(Error::Empty(format!(
            "none of {} rows has a valid '{}' and '{}'",
            df.row_count(),
            config.date_column,
            config.rate_column
        )));
    }

    let kept_regions: Vec<NA<String>> = regions
        .into_iter()
        .zip(&mask)
        .filter(|(_, &keep)| keep)
        .map(|(r, _)| NA::Value(r))
        .collect();

    let mut frame = df.filter_rows(&mask)?;
    frame.set_column(&config.region_column, kept_regions)?;

    debug!(
        "preprocess kept {} of {} rows",
        observations.len(),
        df.row_count()
    );
    CleanTable::new(frame, observations)
}

/// Numeric rate from a cell; NaN counts as missing
fn parse_rate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
