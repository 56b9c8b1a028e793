//! Run configuration
//!
//! A single immutable [`Config`] value is built once in `main` and passed by
//! reference into every component. The defaults reproduce the fixed layout
//! of the reporting run; a TOML file can override any subset of fields.

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the input CSV files
    pub data_dir: PathBuf,
    /// Expected input file names, read in this order
    pub input_files: Vec<String>,
    /// Directory receiving charts and tables, created if absent
    pub output_dir: PathBuf,

    pub region_column: String,
    pub date_column: String,
    pub rate_column: String,
    pub area_column: String,

    /// Number of regions on the top-states chart
    pub top_n: usize,

    /// Last day of the "pre" window (inclusive)
    pub pre_end: NaiveDate,
    /// First day of the "during" window (inclusive)
    pub during_start: NaiveDate,
    /// Last day of the "during" window (inclusive)
    pub during_end: NaiveDate,
    pub histogram_bins: usize,
    /// Regions listed at each end of the impact ranking in the summary
    pub summary_regions: usize,
    /// Impact rows echoed to the console
    pub preview_rows: usize,

    /// Rows kept on the region x month heatmap
    pub heatmap_regions: usize,

    /// Region name standing for the nationwide aggregate
    pub national_label: String,
    pub decomposition_regions: Vec<String>,
    pub min_decomposition_points: usize,
    pub seasonal_period: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("dataset"),
            input_files: vec![
                "Unemployment in India.csv".to_string(),
                "Unemployment_Rate_upto_11_2020.csv".to_string(),
            ],
            output_dir: PathBuf::from("visuals"),
            region_column: "Region".to_string(),
            date_column: "Date".to_string(),
            rate_column: "Estimated Unemployment Rate (%)".to_string(),
            area_column: "Area".to_string(),
            top_n: 6,
            pre_end: ymd(2020, 3, 31),
            during_start: ymd(2020, 4, 1),
            during_end: ymd(2020, 6, 30),
            histogram_bins: 30,
            summary_regions: 10,
            preview_rows: 5,
            heatmap_regions: 30,
            national_label: "India".to_string(),
            decomposition_regions: ["Bihar", "Maharashtra", "Kerala", "Karnataka"]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            min_decomposition_points: 24,
            seasonal_period: 12,
        }
    }
}

// The defaults are valid calendar dates
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Config {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults, or the given file when a path is supplied
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Config::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.input_files.is_empty() {
            return Err(Error::Config("input_files must not be empty".to_string()));
        }
        if self.during_start > self.during_end {
            return Err(Error::Config(format!(
                "during_start {} is after during_end {}",
                self.during_start, self.during_end
            )));
        }
        if self.seasonal_period < 2 {
            return Err(Error::Config("seasonal_period must be at least 2".to_string()));
        }
        if self.histogram_bins == 0 {
            return Err(Error::Config("histogram_bins must be at least 1".to_string()));
        }
        if self.top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        if self.heatmap_regions == 0 {
            return Err(Error::Config("heatmap_regions must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn input_paths(&self) -> Vec<PathBuf> {
        self.input_files
            .iter()
            .map(|f| self.data_dir.join(f))
            .collect()
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}
