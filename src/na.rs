use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::ops::Sub;

/// A cell that either holds a value or is missing (NA, Not Available)
///
/// Missing cells come from empty CSV fields, NA tokens, failed coercions and
/// means over empty groups. They are kept explicit instead of being encoded
/// as `f64::NAN` so that every aggregate has to decide what to do with them.
#[derive(Clone, Copy)]
pub enum NA<T> {
    /// A present value
    Value(T),
    /// A missing value
    NA,
}

impl<T> NA<T> {
    pub fn is_na(&self) -> bool {
        matches!(self, NA::NA)
    }

    pub fn is_value(&self) -> bool {
        !self.is_na()
    }

    /// Borrow the value if present
    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl NA<f64> {
    /// NaN is folded into NA
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            NA::NA
        } else {
            NA::Value(value)
        }
    }

    /// Descending order with NA placed after every present value
    pub fn cmp_desc_na_last(&self, other: &Self) -> Ordering {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (NA::Value(_), NA::NA) => Ordering::Less,
            (NA::NA, NA::Value(_)) => Ordering::Greater,
            (NA::NA, NA::NA) => Ordering::Equal,
        }
    }
}

/// Collect the present values of a slice of cells
pub fn present_values(cells: &[NA<f64>]) -> Vec<f64> {
    cells.iter().filter_map(|c| c.value().copied()).collect()
}

impl<T> From<T> for NA<T> {
    fn from(value: T) -> Self {
        NA::Value(value)
    }
}

impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: PartialEq> PartialEq for NA<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => a == b,
            (NA::NA, NA::NA) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for NA<T> {}

// NA propagates through subtraction
impl<T: Sub<Output = T>> Sub for NA<T> {
    type Output = NA<T>;

    fn sub(self, other: Self) -> Self::Output {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => NA::Value(a - b),
            _ => NA::NA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_propagates_na() {
        assert_eq!(NA::Value(15.0) - NA::Value(5.0), NA::Value(10.0));
        assert!((NA::Value(15.0) - NA::NA).is_na());
        assert!((NA::<f64>::NA - NA::Value(1.0)).is_na());
    }

    #[test]
    fn test_from_f64_folds_nan() {
        assert!(NA::from_f64(f64::NAN).is_na());
        assert_eq!(NA::from_f64(2.5), NA::Value(2.5));
    }

    #[test]
    fn test_desc_na_last() {
        let mut cells = vec![NA::Value(1.0), NA::NA, NA::Value(3.0), NA::Value(-2.0)];
        cells.sort_by(|a, b| a.cmp_desc_na_last(b));
        assert_eq!(
            cells,
            vec![NA::Value(3.0), NA::Value(1.0), NA::Value(-2.0), NA::NA]
        );
    }

    #[test]
    fn test_present_values() {
        let cells = vec![NA::Value(1.0), NA::NA, NA::Value(2.0)];
        assert_eq!(present_values(&cells), vec![1.0, 2.0]);
    }
}
