//! Additive seasonal decomposition
//!
//! `observed = trend + seasonal + resid`, where
//!
//! - the trend is a centred moving average over one period (a 2×p moving
//!   average when the period is even), with the undefined edges filled by a
//!   least-squares line fitted to the `period - 1` nearest defined trend
//!   values on each side;
//! - the seasonal component is the mean detrended value of each phase,
//!   shifted to sum to zero over one period and repeated over the series;
//! - the residual is what remains.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::na::NA;
use crate::stats;
use crate::temporal::TimeSeries;

/// Components of an additive decomposition, one value per time step
#[derive(Debug, Clone)]
pub struct DecompositionResult {
    pub timestamps: Vec<NaiveDate>,
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub resid: Vec<f64>,
    pub period: usize,
}

/// Additive decomposition with a fixed seasonal period
#[derive(Debug, Clone, Copy)]
pub struct SeasonalDecomposition {
    period: usize,
}

impl SeasonalDecomposition {
    pub fn new(period: usize) -> Self {
        SeasonalDecomposition { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Decompose a gap-free series
    ///
    /// Fails with `InsufficientData` when the series has missing values or
    /// fewer than two full periods, and with `ComputationError` when the
    /// arithmetic produces non-finite components.
    pub fn decompose(&self, series: &TimeSeries) -> Result<DecompositionResult> {
        let observed: Vec<f64> = series
            .values()
            .iter()
            .map(|v| match v {
                NA::Value(x) => Ok(*x),
                NA::NA => Err(Error::InsufficientData(
                    "series contains missing values".into(),
                )),
            })
            .collect::<Result<_>>()?;

        let components = self.decompose_values(&observed)?;
        Ok(DecompositionResult {
            timestamps: series.timestamps().to_vec(),
            observed,
            trend: components.0,
            seasonal: components.1,
            resid: components.2,
            period: self.period,
        })
    }

    /// Trend, seasonal and residual components of raw values
    pub fn decompose_values(&self, observed: &[f64]) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let period = self.period;
        if period < 2 {
            return Err(Error::InvalidInput(format!(
                "seasonal period must be at least 2, got {}",
                period
            )));
        }
        let n = observed.len();
        if n < 2 * period {
            return Err(Error::InsufficientData(format!(
                "{} observations, two complete cycles need {}",
                n,
                2 * period
            )));
        }
        if observed.iter().any(|v| !v.is_finite()) {
            return Err(Error::ComputationError(
                "observed values must be finite".into(),
            ));
        }

        let mut trend = centered_moving_average(observed, period);
        extrapolate_trend(&mut trend, period - 1)?;
        let trend: Vec<f64> = trend
            .into_iter()
            .map(|t| t.into_option().unwrap_or(f64::NAN))
            .collect();

        let detrended: Vec<f64> = observed.iter().zip(&trend).map(|(x, t)| x - t).collect();

        let mut phase_means: Vec<f64> = (0..period)
            .map(|phase| {
                let cells: Vec<NA<f64>> = detrended
                    .iter()
                    .skip(phase)
                    .step_by(period)
                    .map(|&v| NA::from_f64(v))
                    .collect();
                stats::mean(&cells).into_option().unwrap_or(f64::NAN)
            })
            .collect();
        let overall = phase_means.iter().sum::<f64>() / period as f64;
        for m in phase_means.iter_mut() {
            *m -= overall;
        }

        let seasonal: Vec<f64> = (0..n).map(|i| phase_means[i % period]).collect();
        let resid: Vec<f64> = detrended.iter().zip(&seasonal).map(|(d, s)| d - s).collect();

        if trend
            .iter()
            .chain(&seasonal)
            .chain(&resid)
            .any(|v| !v.is_finite())
        {
            return Err(Error::ComputationError(
                "decomposition produced non-finite components".into(),
            ));
        }

        Ok((trend, seasonal, resid))
    }
}

/// Moving-average weights for one period
///
/// An even period uses `period + 1` taps with half weight at both ends.
fn moving_average_weights(period: usize) -> Vec<f64> {
    if period % 2 == 0 {
        let mut weights = vec![1.0 / period as f64; period + 1];
        weights[0] = 0.5 / period as f64;
        weights[period] = 0.5 / period as f64;
        weights
    } else {
        vec![1.0 / period as f64; period]
    }
}

/// Centred moving average; positions without a full window are NA
fn centered_moving_average(values: &[f64], period: usize) -> Vec<NA<f64>> {
    let weights = moving_average_weights(period);
    let half = weights.len() / 2;
    let tail = weights.len() - 1 - half;
    let n = values.len();

    (0..n)
        .map(|i| {
            if i < half || i + tail >= n {
                return NA::NA;
            }
            let start = i - half;
            let sum: f64 = weights
                .iter()
                .zip(&values[start..start + weights.len()])
                .map(|(w, v)| w * v)
                .sum();
            NA::Value(sum)
        })
        .collect()
}

/// Fill the NA edges of a trend by linear extrapolation
///
/// The front line is fitted to the first `npoints` defined values, the back
/// line to the `npoints` defined values preceding the last one.
fn extrapolate_trend(trend: &mut [NA<f64>], npoints: usize) -> Result<()> {
    let front = trend
        .iter()
        .position(|v| v.is_value())
        .ok_or_else(|| Error::InsufficientData("trend has no defined values".into()))?;
    let back = trend
        .iter()
        .rposition(|v| v.is_value())
        .ok_or_else(|| Error::InsufficientData("trend has no defined values".into()))?;

    let front_last = (front + npoints).min(back);
    let back_first = back.saturating_sub(npoints).max(front);

    let fit = |range: std::ops::Range<usize>, trend: &[NA<f64>]| -> Result<(f64, f64)> {
        let xs: Vec<f64> = range.clone().map(|i| i as f64).collect();
        let ys: Vec<f64> = range
            .map(|i| trend[i].into_option().unwrap_or(f64::NAN))
            .collect();
        stats::linear_fit(&xs, &ys)
    };

    let (slope, intercept) = fit(front..front_last, trend)?;
    for (i, slot) in trend.iter_mut().enumerate().take(front) {
        *slot = NA::Value(slope * i as f64 + intercept);
    }

    let (slope, intercept) = fit(back_first..back, trend)?;
    for (i, slot) in trend.iter_mut().enumerate().skip(back + 1) {
        *slot = NA::Value(slope * i as f64 + intercept);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::month_end;

    const PATTERN: [f64; 12] = [
        1.0, -2.0, 0.5, 3.0, -1.5, 0.0, 2.0, -3.0, 1.5, -0.5, 0.25, -1.25,
    ];

    fn monthly_series(values: Vec<f64>) -> TimeSeries {
        let mut dates = Vec::with_capacity(values.len());
        let mut current = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
        for _ in 0..values.len() {
            dates.push(current);
            current = month_end(current + chrono::Duration::days(1));
        }
        TimeSeries::new(values.into_iter().map(NA::Value).collect(), dates, None).unwrap()
    }

    #[test]
    fn test_weights_even_period() {
        let w = moving_average_weights(12);
        assert_eq!(w.len(), 13);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[0] - 1.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_recovers_linear_trend_and_pattern() {
        // PATTERN sums to zero, so the moving average sees the line alone
        let values: Vec<f64> = (0..36)
            .map(|i| 5.0 + 0.2 * i as f64 + PATTERN[i % 12])
            .collect();
        let result = SeasonalDecomposition::new(12)
            .decompose(&monthly_series(values))
            .unwrap();

        for i in 0..36 {
            assert!((result.trend[i] - (5.0 + 0.2 * i as f64)).abs() < 1e-9, "trend at {}", i);
            assert!((result.seasonal[i] - PATTERN[i % 12]).abs() < 1e-9, "seasonal at {}", i);
            assert!(result.resid[i].abs() < 1e-9, "resid at {}", i);
        }
        assert_eq!(result.timestamps.len(), 36);
    }

    #[test]
    fn test_components_sum_to_observed() {
        let values: Vec<f64> = (0..30)
            .map(|i| ((i * 7) % 11) as f64 + (i as f64).sqrt())
            .collect();
        let (trend, seasonal, resid) = SeasonalDecomposition::new(12)
            .decompose_values(&values)
            .unwrap();
        for i in 0..values.len() {
            assert!((trend[i] + seasonal[i] + resid[i] - values[i]).abs() < 1e-9);
        }
        let one_cycle: f64 = seasonal[..12].iter().sum();
        assert!(one_cycle.abs() < 1e-9);
    }

    #[test]
    fn test_requires_two_cycles() {
        let result = SeasonalDecomposition::new(12).decompose_values(&[1.0; 23]);
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_missing_values_rejected() {
        let mut series = monthly_series(vec![1.0; 30]);
        series = TimeSeries::new(
            series
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| if i == 3 { NA::NA } else { *v })
                .collect(),
            series.timestamps().to_vec(),
            None,
        )
        .unwrap();
        let result = SeasonalDecomposition::new(12).decompose(&series);
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_odd_period() {
        let values: Vec<f64> = (0..14).map(|i| i as f64 + [1.0, 0.0, -1.0][i % 3]).collect();
        let (trend, seasonal, _) = SeasonalDecomposition::new(3)
            .decompose_values(&values)
            .unwrap();
        assert!((trend[5] - 5.0).abs() < 1e-9);
        assert!((seasonal[0] - 1.0).abs() < 1e-9);
    }
}
