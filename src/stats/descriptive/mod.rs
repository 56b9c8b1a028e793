// Descriptive statistics

use crate::na::NA;

pub(crate) fn mean_impl(data: &[f64]) -> NA<f64> {
    if data.is_empty() {
        return NA::NA;
    }
    NA::Value(data.iter().sum::<f64>() / data.len() as f64)
}

pub(crate) fn median_impl(data: &[f64]) -> NA<f64> {
    if data.is_empty() {
        return NA::NA;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };
    NA::Value(median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    #[test]
    fn test_mean_and_median() {
        let data = vec![1.0, 2.0, 3.0, 10.0];
        assert_eq!(mean_impl(&data), NA::Value(4.0));
        assert_eq!(median_impl(&data), NA::Value(2.5));
        assert_eq!(median_impl(&[3.0, 1.0, 2.0]), NA::Value(2.0));
    }

    #[test]
    fn test_empty_is_na() {
        assert!(mean_impl(&[]).is_na());
        assert!(median_impl(&[]).is_na());
    }

    #[test]
    fn test_na_cells_skipped() {
        let cells = vec![NA::Value(1.0), NA::NA, NA::Value(5.0)];
        assert_eq!(stats::mean(&cells), NA::Value(3.0));
        assert_eq!(stats::median(&cells), NA::Value(3.0));
        assert!(stats::mean(&[NA::NA]).is_na());
    }
}
