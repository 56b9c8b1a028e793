// Statistics over NA-aware data
//
// Aggregates skip missing cells; an aggregate over nothing is itself missing.

pub mod descriptive;
pub mod regression;

use crate::error::Result;
use crate::na::NA;

/// Mean of the present values, NA when there are none
pub fn mean(data: &[NA<f64>]) -> NA<f64> {
    descriptive::mean_impl(&crate::na::present_values(data))
}

/// Median of the present values, NA when there are none
pub fn median(data: &[NA<f64>]) -> NA<f64> {
    descriptive::median_impl(&crate::na::present_values(data))
}

/// Least-squares line through `(x, y)`, returned as `(slope, intercept)`
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    regression::linear_fit_impl(x, y)
}
