use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::{Error, Result};

/// Values grouped by key, keys iterated in ascending order
///
/// Within a group, positions keep the order of the source slice, so
/// order-sensitive aggregates such as [`GroupBy::last`] follow input order.
#[derive(Debug)]
pub struct GroupBy<'a, K>
where
    K: Debug + Ord + Clone,
{
    groups: BTreeMap<K, Vec<usize>>,
    source: &'a [f64],
}

impl<'a, K> GroupBy<'a, K>
where
    K: Debug + Ord + Clone,
{
    pub fn new(keys: Vec<K>, source: &'a [f64]) -> Result<Self> {
        if keys.len() != source.len() {
            return Err(Error::Consistency(format!(
                "{} keys for {} values",
                keys.len(),
                source.len()
            )));
        }

        let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for (i, key) in keys.into_iter().enumerate() {
            groups.entry(key).or_default().push(i);
        }

        Ok(GroupBy { groups, source })
    }

    /// Arithmetic mean per group, NaN values skipped
    ///
    /// Groups without any non-NaN value are left out.
    pub fn mean(&self) -> BTreeMap<K, f64> {
        let mut results = BTreeMap::new();
        for (key, indices) in &self.groups {
            let values: Vec<f64> = indices
                .iter()
                .map(|&i| self.source[i])
                .filter(|v| !v.is_nan())
                .collect();
            if !values.is_empty() {
                let sum: f64 = values.iter().sum();
                results.insert(key.clone(), sum / values.len() as f64);
            }
        }
        results
    }

    /// Value at the last position of each group
    pub fn last(&self) -> BTreeMap<K, f64> {
        self.groups
            .iter()
            .filter_map(|(k, indices)| indices.last().map(|&i| (k.clone(), self.source[i])))
            .collect()
    }
}

/// Mean of `values` grouped by `keys`
pub fn group_mean<K>(keys: Vec<K>, values: &[f64]) -> Result<BTreeMap<K, f64>>
where
    K: Debug + Ord + Clone,
{
    Ok(GroupBy::new(keys, values)?.mean())
}
