use log::{debug, info, warn};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::preprocess::CleanTable;
use crate::report::{mean_by_date, national_series};
use crate::temporal::TimeSeries;
use crate::time_series::SeasonalDecomposition;
use crate::vis::{plot_decomposition, PlotSettings};

pub fn decomposition_file_name(region: &str) -> String {
    format!("decompose_{}.png", region.replace(' ', "_"))
}

/// Per-date mean rate of `region`, or of every region for the national label
pub fn decomposition_series(table: &CleanTable, region: &str, config: &Config) -> Result<TimeSeries> {
    if region == config.national_label {
        national_series(table)
    } else {
        mean_by_date(table.region_observations(region), Some(region.to_string()))
    }
}

/// Decompose one region's series and chart it
///
/// Returns `Ok(None)` without writing anything when the series is too short
/// or cannot be decomposed.
pub fn decompose_example(
    table: &CleanTable,
    region: &str,
    config: &Config,
) -> Result<Option<PathBuf>> {
    let series = decomposition_series(table, region, config)?;
    let present = series.count_present();
    if present < config.min_decomposition_points {
        debug!(
            "{}: {} points, need {} for decomposition",
            region, present, config.min_decomposition_points
        );
        return Ok(None);
    }

    let monthly = series.asfreq_month_end().interpolate_linear();
    let result = match SeasonalDecomposition::new(config.seasonal_period).decompose(&monthly) {
        Ok(result) => result,
        Err(e) => {
            if e.is_soft_skip() {
                debug!("{}: decomposition skipped: {}", region, e);
            } else {
                warn!("{}: decomposition failed: {}", region, e);
            }
            return Ok(None);
        }
    };

    let path = config.output_path(&decomposition_file_name(region));
    let settings = PlotSettings::new(region, "Date", "").with_size(1000, 800);
    plot_decomposition(&result, &path, &settings)?;

    info!("{}: decomposition -> {}", region, path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::Observation;
    use crate::temporal::month_end;
    use chrono::{Duration, NaiveDate};

    fn monthly_observations(region: &str, months: usize) -> Vec<Observation> {
        let mut date = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
        let mut out = Vec::new();
        for i in 0..months {
            out.push(Observation {
                region: region.to_string(),
                date,
                rate: 5.0 + (i % 12) as f64,
                area: None,
            });
            date = month_end(date + Duration::days(1));
        }
        out
    }

    #[test]
    fn test_file_name_replaces_spaces() {
        assert_eq!(decomposition_file_name("Tamil Nadu"), "decompose_Tamil_Nadu.png");
        assert_eq!(decomposition_file_name("India"), "decompose_India.png");
    }

    #[test]
    fn test_short_series_skipped_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let table =
            CleanTable::from_observations(monthly_observations("Goa", 23), &config).unwrap();

        assert_eq!(decompose_example(&table, "Goa", &config).unwrap(), None);
        assert!(!dir.path().join("decompose_Goa.png").exists());
    }

    fn config_in(dir: &tempfile::TempDir) -> Config {
        Config {
            output_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_interior_gaps_filled_before_charting() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let observations: Vec<Observation> = monthly_observations("Tamil Nadu", 30)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| ![4, 5, 17].contains(i))
            .map(|(_, o)| o)
            .collect();
        assert_eq!(observations.len(), 27);
        let table = CleanTable::from_observations(observations, &config).unwrap();

        let monthly = decomposition_series(&table, "Tamil Nadu", &config)
            .unwrap()
            .asfreq_month_end()
            .interpolate_linear();
        assert_eq!(monthly.len(), 30);
        assert_eq!(monthly.count_present(), 30);

        let path = decompose_example(&table, "Tamil Nadu", &config)
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("decompose_Tamil_Nadu.png"));
        assert!(path.exists());
    }

    #[test]
    fn test_leading_gap_after_reindex_skipped_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut observations = monthly_observations("Goa", 30);
        // mid-month first reading has no month-end counterpart
        observations[0].date = NaiveDate::from_ymd_opt(2018, 1, 15).unwrap();
        let table = CleanTable::from_observations(observations, &config).unwrap();

        let monthly = decomposition_series(&table, "Goa", &config)
            .unwrap()
            .asfreq_month_end()
            .interpolate_linear();
        assert!(monthly.values()[0].is_na());

        assert_eq!(decompose_example(&table, "Goa", &config).unwrap(), None);
        assert!(!dir.path().join("decompose_Goa.png").exists());
    }

    #[test]
    fn test_unknown_region_skipped() {
        let config = Config::default();
        let table =
            CleanTable::from_observations(monthly_observations("Goa", 30), &config).unwrap();
        assert_eq!(decompose_example(&table, "Bihar", &config).unwrap(), None);
    }

    #[test]
    fn test_national_label_uses_all_regions() {
        let config = Config::default();
        let mut observations = monthly_observations("Goa", 3);
        observations.extend(monthly_observations("Kerala", 3));
        let table = CleanTable::from_observations(observations, &config).unwrap();

        let national = decomposition_series(&table, "India", &config).unwrap();
        assert_eq!(national.len(), 3);
        let goa = decomposition_series(&table, "Goa", &config).unwrap();
        assert_eq!(goa.len(), 3);
    }
}
