//! Reporters
//!
//! Each reporter derives one view from the cleaned table, renders its
//! charts or tables into the output directory and returns the computed
//! values for the console summary.

pub mod decomposition;
pub mod impact;
pub mod national;
pub mod seasonality;
pub mod top_states;

use chrono::NaiveDate;

use crate::error::Result;
use crate::groupby::group_mean;
use crate::preprocess::Observation;
use crate::temporal::TimeSeries;

pub use self::decomposition::{decompose_example, decomposition_file_name};
pub use self::impact::{covid_impact, ImpactRow, ImpactSummary};
pub use self::national::{national_series, national_trend};
pub use self::seasonality::{monthly_means, seasonality_analysis};
pub use self::top_states::{latest_rates, top_regions, top_states_plot};

/// Mean rate per distinct date, ascending by date
pub fn mean_by_date<'a, I>(observations: I, name: Option<String>) -> Result<TimeSeries>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let (dates, rates): (Vec<NaiveDate>, Vec<f64>) =
        observations.into_iter().map(|o| (o.date, o.rate)).unzip();
    let means = group_mean(dates, &rates)?;
    Ok(TimeSeries::from_map(&means, name))
}
