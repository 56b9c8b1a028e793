use chrono::{Datelike, Duration, NaiveDate};

use crate::temporal::TimeSeries;

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first_of_next| first_of_next - Duration::days(1))
        .unwrap_or(date)
}

/// Reindex a series onto a strict month-end grid
///
/// The grid runs over every calendar month-end from the first month-end on
/// or after the first timestamp up to the last timestamp. A grid point takes
/// the series value recorded on exactly that date; any other date is NA.
/// Values on non-month-end dates are therefore not carried over.
pub fn asfreq_month_end(series: &TimeSeries) -> TimeSeries {
    let (first, last) = match (series.timestamps().first(), series.timestamps().last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return series.clone(),
    };

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    let mut current = month_end(first);
    while current <= last {
        timestamps.push(current);
        values.push(series.get(current));
        current = month_end(current + Duration::days(1));
    }

    TimeSeries::new(values, timestamps, series.name().cloned())
        .unwrap_or_else(|_| series.clone())
}
