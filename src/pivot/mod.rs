//! Region × calendar-month pivot of mean rates

use chrono::Datelike;
use std::collections::BTreeMap;

use crate::na::NA;
use crate::preprocess::CleanTable;

/// Mean rate per region (rows) and calendar month (12 columns)
///
/// A cell is NA when the region has no observation in that month.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMonthPivot {
    regions: Vec<String>,
    cells: Vec<[NA<f64>; 12]>,
}

impl RegionMonthPivot {
    /// Pivot every observation, rows ordered by region name
    pub fn build(table: &CleanTable) -> Self {
        let mut sums: BTreeMap<&str, [(f64, usize); 12]> = BTreeMap::new();
        for obs in table.observations() {
            let slot = &mut sums.entry(obs.region.as_str()).or_insert([(0.0, 0); 12])
                [obs.date.month0() as usize];
            slot.0 += obs.rate;
            slot.1 += 1;
        }

        let mut regions = Vec::with_capacity(sums.len());
        let mut cells = Vec::with_capacity(sums.len());
        for (region, months) in sums {
            regions.push(region.to_string());
            cells.push(months.map(|(sum, count)| {
                if count == 0 {
                    NA::NA
                } else {
                    NA::from_f64(sum / count as f64)
                }
            }));
        }
        RegionMonthPivot { regions, cells }
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[NA<f64>; 12])> {
        self.regions.iter().map(|r| r.as_str()).zip(self.cells.iter())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Present cells per row
    pub fn completeness(&self) -> Vec<usize> {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| c.is_value()).count())
            .collect()
    }

    /// Keep the `n` rows with the most present cells
    ///
    /// Rows are ordered by present-cell count, descending; equal counts keep
    /// region-name order.
    pub fn restrict_to_most_complete(&self, n: usize) -> Self {
        let completeness = self.completeness();
        let mut order: Vec<usize> = (0..self.regions.len()).collect();
        order.sort_by(|&a, &b| completeness[b].cmp(&completeness[a]));
        order.truncate(n);

        RegionMonthPivot {
            regions: order.iter().map(|&i| self.regions[i].clone()).collect(),
            cells: order.iter().map(|&i| self.cells[i]).collect(),
        }
    }

    /// Smallest and largest present value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter_map(|c| c.value().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
