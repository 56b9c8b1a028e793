//! Date parsing and date-indexed series

mod resample;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::na::NA;

pub use self::resample::{asfreq_month_end, month_end};

lazy_static! {
    // 05-01-2020, 5/1/2020, 05.01.20, optionally followed by a time of day
    static ref DAY_FIRST: Regex =
        Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4}|\d{2})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$")
            .expect("valid day-first pattern");
    // 2020-01-05, year first is unambiguous
    static ref ISO: Regex =
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$")
            .expect("valid ISO pattern");
}

/// Parse a date written day-first ("05-01-2020" is 5 January 2020)
///
/// Surrounding whitespace is ignored. Year-first ISO dates are accepted as
/// well. Two-digit years below 69 are 20xx, the rest 19xx. Returns `None`
/// for anything that is not a valid calendar date.
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(caps) = ISO.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let caps = DAY_FIRST.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year_text = &caps[3];
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        year += if year < 69 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A date-indexed series of optional values, ordered by date
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<NA<f64>>,
    timestamps: Vec<NaiveDate>,
    name: Option<String>,
}

impl TimeSeries {
    pub fn new(values: Vec<NA<f64>>, timestamps: Vec<NaiveDate>, name: Option<String>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(Error::Consistency(format!(
                "{} values for {} timestamps",
                values.len(),
                timestamps.len()
            )));
        }
        if timestamps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Consistency(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
        Ok(TimeSeries {
            values,
            timestamps,
            name,
        })
    }

    /// Build from an ordered map of date to value
    pub fn from_map(map: &BTreeMap<NaiveDate, f64>, name: Option<String>) -> Self {
        TimeSeries {
            values: map.values().map(|&v| NA::from_f64(v)).collect(),
            timestamps: map.keys().copied().collect(),
            name,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    pub fn values(&self) -> &[NA<f64>] {
        &self.values
    }

    /// Number of present values
    pub fn count_present(&self) -> usize {
        self.values.iter().filter(|v| v.is_value()).count()
    }

    /// Value at exactly `date`, NA when the date is absent
    pub fn get(&self, date: NaiveDate) -> NA<f64> {
        match self.timestamps.binary_search(&date) {
            Ok(i) => self.values[i],
            Err(_) => NA::NA,
        }
    }

    /// (date, value) pairs of the present values
    pub fn points(&self) -> Vec<(NaiveDate, f64)> {
        self.timestamps
            .iter()
            .zip(&self.values)
            .filter_map(|(d, v)| v.value().map(|&v| (*d, v)))
            .collect()
    }

    /// Reindex onto calendar month-ends, see [`asfreq_month_end`]
    pub fn asfreq_month_end(&self) -> Self {
        asfreq_month_end(self)
    }

    /// Fill missing values by linear interpolation over positions
    ///
    /// Gaps between two present values are filled on the straight line
    /// joining them; trailing gaps repeat the last present value; leading
    /// gaps stay missing.
    pub fn interpolate_linear(&self) -> Self {
        let mut values = self.values.clone();
        let mut last: Option<(usize, f64)> = None;

        for i in 0..values.len() {
            if let NA::Value(v) = values[i] {
                if let Some((j, prev)) = last {
                    let span = (i - j) as f64;
                    for (k, slot) in values.iter_mut().enumerate().take(i).skip(j + 1) {
                        let t = (k - j) as f64 / span;
                        *slot = NA::Value(prev + (v - prev) * t);
                    }
                }
                last = Some((i, v));
            }
        }

        if let Some((j, prev)) = last {
            for slot in values.iter_mut().skip(j + 1) {
                *slot = NA::Value(prev);
            }
        }

        TimeSeries {
            values,
            timestamps: self.timestamps.clone(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_assigns_day_then_month() {
        assert_eq!(parse_day_first("05-01-2020"), Some(date(2020, 1, 5)));
        assert_eq!(parse_day_first(" 31-05-2019"), Some(date(2019, 5, 31)));
        assert_eq!(parse_day_first("1/2/2020"), Some(date(2020, 2, 1)));
        assert_eq!(parse_day_first("30.04.20"), Some(date(2020, 4, 30)));
        assert_eq!(parse_day_first("31-03-2020 00:00"), Some(date(2020, 3, 31)));
    }

    #[test]
    fn test_day_first_rejects_invalid() {
        assert_eq!(parse_day_first("31-02-2020"), None);
        assert_eq!(parse_day_first("05-13-2020"), None);
        assert_eq!(parse_day_first("yesterday"), None);
        assert_eq!(parse_day_first(""), None);
    }

    #[test]
    fn test_iso_dates_accepted() {
        assert_eq!(parse_day_first("2020-01-05"), Some(date(2020, 1, 5)));
    }

    #[test]
    fn test_new_rejects_unordered() {
        let result = TimeSeries::new(
            vec![NA::Value(1.0), NA::Value(2.0)],
            vec![date(2020, 2, 1), date(2020, 1, 1)],
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_interpolate_linear() {
        let ts = TimeSeries::new(
            vec![NA::NA, NA::Value(1.0), NA::NA, NA::NA, NA::Value(4.0), NA::NA],
            (1..=6).map(|m| date(2020, m, 1)).collect(),
            None,
        )
        .unwrap();
        let filled = ts.interpolate_linear();
        assert_eq!(
            filled.values(),
            &[
                NA::NA,
                NA::Value(1.0),
                NA::Value(2.0),
                NA::Value(3.0),
                NA::Value(4.0),
                NA::Value(4.0)
            ]
        );
    }
}
