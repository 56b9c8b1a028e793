mod common;

use chrono::NaiveDate;

use common::{regional_csv, TempTestDir};
use unemployment_insights::loader::load_data;
use unemployment_insights::preprocess::preprocess;
use unemployment_insights::report::impact::{
    covid_impact, read_impact_csv, sort_impact, IMPACT_HISTOGRAM_FILE, IMPACT_TABLE_FILE,
};
use unemployment_insights::report::national_series;
use unemployment_insights::{CleanTable, NA};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clean(dir: &TempTestDir, rows: &[(&str, NaiveDate, f64, &str)]) -> CleanTable {
    dir.write_dataset("Unemployment in India.csv", &regional_csv(rows));
    let config = dir.config();
    std::fs::create_dir_all(&config.output_dir).unwrap();
    preprocess(load_data(&config).unwrap(), &config).unwrap()
}

#[test]
fn test_pre_and_covid_means() {
    let dir = TempTestDir::new("impact_basic").unwrap();
    let table = clean(
        &dir,
        &[
            ("Goa", date(2020, 3, 1), 5.0, "Rural"),
            ("Goa", date(2020, 5, 1), 15.0, "Rural"),
            ("Tripura", date(2020, 5, 1), 20.0, "Urban"),
        ],
    );

    let (rows, summary) = covid_impact(&table, &dir.config()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].region, "Goa");
    assert_eq!(rows[0].pre_mean, NA::Value(5.0));
    assert_eq!(rows[0].covid_mean, NA::Value(15.0));
    assert_eq!(rows[0].abs_change, NA::Value(10.0));

    assert_eq!(rows[1].region, "Tripura");
    assert!(rows[1].pre_mean.is_na());
    assert!(rows[1].abs_change.is_na());

    assert_eq!(summary.mean_abs_change, NA::Value(10.0));
    assert_eq!(summary.regions_most_affected, vec!["Goa", "Tripura"]);
    assert_eq!(summary.regions_least_affected, vec!["Goa", "Tripura"]);
    assert!(dir.output_dir().join(IMPACT_HISTOGRAM_FILE).exists());
}

#[test]
fn test_table_round_trips_and_resort_is_stable() {
    let dir = TempTestDir::new("impact_round_trip").unwrap();
    let table = clean(
        &dir,
        &[
            ("Assam", date(2020, 1, 31), 4.0, "Rural"),
            ("Assam", date(2020, 4, 30), 9.5, "Rural"),
            ("Bihar", date(2020, 2, 29), 10.25, "Rural"),
            ("Bihar", date(2020, 5, 31), 46.5, "Rural"),
            ("Delhi", date(2020, 1, 31), 16.0, "Urban"),
            ("Delhi", date(2020, 6, 30), 21.5, "Urban"),
            ("Goa", date(2019, 12, 31), 3.0, "Urban"),
        ],
    );

    let (rows, _) = covid_impact(&table, &dir.config()).unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(order, vec!["Bihar", "Assam", "Delhi", "Goa"]);

    let reloaded = read_impact_csv(dir.output_dir().join(IMPACT_TABLE_FILE)).unwrap();
    assert_eq!(reloaded, rows);

    let mut resorted = reloaded.clone();
    sort_impact(&mut resorted);
    assert_eq!(resorted, rows);
}

#[test]
fn test_no_complete_region_skips_histogram() {
    let dir = TempTestDir::new("impact_no_hist").unwrap();
    let table = clean(&dir, &[("Goa", date(2020, 5, 1), 15.0, "Rural")]);

    let (rows, summary) = covid_impact(&table, &dir.config()).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(summary.mean_abs_change.is_na());
    assert!(summary.median_abs_change.is_na());
    assert!(dir.output_dir().join(IMPACT_TABLE_FILE).exists());
    assert!(!dir.output_dir().join(IMPACT_HISTOGRAM_FILE).exists());
}

#[test]
fn test_national_series_means() {
    let dir = TempTestDir::new("national").unwrap();
    let table = clean(
        &dir,
        &[
            ("A", date(2020, 1, 31), 10.0, "Rural"),
            ("B", date(2020, 1, 31), 20.0, "Rural"),
            ("A", date(2020, 2, 29), 30.0, "Rural"),
            ("B", date(2020, 2, 29), 40.0, "Rural"),
        ],
    );
    let national = national_series(&table).unwrap();
    assert_eq!(national.values(), &[NA::Value(15.0), NA::Value(35.0)]);
}
