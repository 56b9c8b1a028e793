//! Test utilities for temporary datasets
//!
//! Provides self-cleaning temporary directories and writers for small
//! regional unemployment CSV files in the layout the loader expects.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use unemployment_insights::temporal::month_end;
use unemployment_insights::Config;

static TEST_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const RATE_HEADER: &str = "Estimated Unemployment Rate (%)";

/// Get the temporary directory, respecting environment variables
///
/// Checks in order: TMPDIR, TEMP, TMP, then falls back to std::env::temp_dir()
pub fn get_temp_dir() -> PathBuf {
    env::var("TMPDIR")
        .or_else(|_| env::var("TEMP"))
        .or_else(|_| env::var("TMP"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir())
}

/// Generate a unique test directory path
pub fn test_temp_dir(test_name: &str) -> PathBuf {
    let counter = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dirname = format!(
        "unemployment_test_dir_{}_{}_{}",
        test_name,
        std::process::id(),
        counter
    );
    get_temp_dir().join(dirname)
}

/// RAII wrapper for temporary test directories with automatic cleanup
///
/// The directory holds a `dataset/` input folder and a `visuals/` output
/// folder path (created by the pipeline itself).
pub struct TempTestDir {
    path: PathBuf,
    keep: bool,
}

impl TempTestDir {
    pub fn new(test_name: &str) -> std::io::Result<Self> {
        let path = test_temp_dir(test_name);
        fs::create_dir_all(path.join("dataset"))?;
        Ok(TempTestDir { path, keep: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join("dataset")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path.join("visuals")
    }

    /// Keep the directory after drop (for debugging)
    pub fn keep(&mut self) {
        self.keep = true;
    }

    /// Default configuration rooted in this directory
    pub fn config(&self) -> Config {
        Config {
            data_dir: self.data_dir(),
            output_dir: self.output_dir(),
            ..Config::default()
        }
    }

    /// Write `content` verbatim as `dataset/<name>`
    pub fn write_dataset(&self, name: &str, content: &str) -> PathBuf {
        let path = self.data_dir().join(name);
        fs::write(&path, content).expect("Failed to write dataset");
        path
    }
}

impl Drop for TempTestDir {
    fn drop(&mut self) {
        if !self.keep && self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// `count` consecutive month-ends starting with the month of `start`
pub fn month_ends(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count);
    let mut current = month_end(start);
    for _ in 0..count {
        dates.push(current);
        current = month_end(current + Duration::days(1));
    }
    dates
}

/// Day-first date text as found in the source files
pub fn day_first(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// CSV text in the layout of the regional file:
/// `Region, Date, Frequency, Estimated Unemployment Rate (%), Area`
///
/// Leading spaces in headers and cells mirror the published files.
pub fn regional_csv(rows: &[(&str, NaiveDate, f64, &str)]) -> String {
    let mut out = format!("Region, Date, Frequency, {}, Area\n", RATE_HEADER);
    for (region, date, rate, area) in rows {
        out.push_str(&format!(
            "{}, {}, Monthly, {}, {}\n",
            region,
            day_first(*date),
            rate,
            area
        ));
    }
    out
}

/// CSV text in the layout of the national file, which repeats the region
/// header: `Region, Date, Frequency, Estimated Unemployment Rate (%), Region`
pub fn national_csv(rows: &[(&str, NaiveDate, f64, &str)]) -> String {
    let mut out = format!("Region, Date, Frequency, {},Region\n", RATE_HEADER);
    for (region, date, rate, zone) in rows {
        out.push_str(&format!(
            "{}, {}, M, {},{}\n",
            region,
            day_first(*date),
            rate,
            zone
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_cleanup() {
        let path;
        {
            let dir = TempTestDir::new("cleanup").unwrap();
            path = dir.path().to_path_buf();
            dir.write_dataset("a.csv", "x\n1\n");
            assert!(dir.data_dir().join("a.csv").exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_month_ends() {
        let dates = month_ends(NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(), 3);
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert_eq!(day_first(dates[2]), "31-03-2020");
    }
}
