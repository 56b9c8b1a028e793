// Simple linear regression

use crate::error::{Error, Result};

/// Ordinary least squares for `y = slope * x + intercept`
pub(crate) fn linear_fit_impl(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    if x.len() != y.len() {
        return Err(Error::Consistency(format!(
            "regression inputs differ in length: x={}, y={}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::InsufficientData(
            "a line fit needs at least two points".into(),
        ));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxx: f64 = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum();
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    if sxx.abs() < f64::EPSILON {
        return Err(Error::ComputationError(
            "line fit: x values have zero variance".into(),
        ));
    }

    let slope = sxy / sxx;
    Ok((slope, mean_y - slope * mean_x))
}
