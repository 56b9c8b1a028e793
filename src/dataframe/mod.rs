//! Raw string table with explicit missing cells
//!
//! This is the shape data has between the CSV reader and the preprocessor:
//! every cell is text or NA, columns keep their first-seen order, and tables
//! read from different files can be stacked with a column union.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::na::NA;

/// Column-ordered table of optional strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    data: HashMap<String, Vec<NA<String>>>,
    row_count: usize,
}

impl DataFrame {
    pub fn new() -> Self {
        DataFrame::default()
    }

    /// Build a table from a header and row-major records
    ///
    /// Short records are padded with NA and long records truncated.
    pub fn from_records(headers: Vec<String>, records: Vec<Vec<NA<String>>>) -> Result<Self> {
        let mut df = DataFrame::new();
        let mut columns: Vec<Vec<NA<String>>> = headers
            .iter()
            .map(|_| Vec::with_capacity(records.len()))
            .collect();

        for record in &records {
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(record.get(i).cloned().unwrap_or(NA::NA));
            }
        }

        df.row_count = records.len();
        for (name, values) in headers.into_iter().zip(columns) {
            if df.contains_column(&name) {
                return Err(Error::Consistency(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
            df.columns.push(name.clone());
            df.data.insert(name, values);
        }
        Ok(df)
    }

    /// Append a column; its length must match the existing row count
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<NA<String>>) -> Result<()> {
        let name = name.into();
        if self.contains_column(&name) {
            return Err(Error::Consistency(format!(
                "duplicate column name '{}'",
                name
            )));
        }
        if !self.columns.is_empty() && values.len() != self.row_count {
            return Err(Error::Consistency(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.row_count
            )));
        }
        if self.columns.is_empty() {
            self.row_count = values.len();
        }
        self.columns.push(name.clone());
        self.data.insert(name, values);
        Ok(())
    }

    /// Replace the cells of an existing column
    pub fn set_column(&mut self, name: &str, values: Vec<NA<String>>) -> Result<()> {
        if values.len() != self.row_count {
            return Err(Error::Consistency(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.row_count
            )));
        }
        match self.data.get_mut(name) {
            Some(column) => {
                *column = values;
                Ok(())
            }
            None => Err(Error::MissingColumn(name.to_string())),
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn get_column(&self, name: &str) -> Option<&[NA<String>]> {
        self.data.get(name).map(|v| v.as_slice())
    }

    /// Like `get_column`, but a missing column is an error
    pub fn column(&self, name: &str) -> Result<&[NA<String>]> {
        self.get_column(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Rename a column
    ///
    /// When `new` already exists the two columns are coalesced: the surviving
    /// column keeps its position and its NA cells are filled from `old`.
    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let old_values = self
            .data
            .remove(old)
            .ok_or_else(|| Error::MissingColumn(old.to_string()))?;

        match self.data.get_mut(new) {
            Some(existing) => {
                for (cell, fallback) in existing.iter_mut().zip(old_values) {
                    if cell.is_na() {
                        *cell = fallback;
                    }
                }
                self.columns.retain(|c| c != old);
            }
            None => {
                if let Some(slot) = self.columns.iter_mut().find(|c| c.as_str() == old) {
                    *slot = new.to_string();
                }
                self.data.insert(new.to_string(), old_values);
            }
        }
        Ok(())
    }

    /// Rename every column through `f`, in column order
    pub fn rename_columns<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let originals = self.columns.clone();
        for old in originals {
            let new = f(&old);
            if new != old {
                self.rename_column(&old, &new)?;
            }
        }
        Ok(())
    }

    /// Keep only the rows whose mask entry is `true`
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.row_count {
            return Err(Error::Consistency(format!(
                "mask has {} entries, table has {} rows",
                mask.len(),
                self.row_count
            )));
        }
        let mut data = HashMap::with_capacity(self.columns.len());
        for name in &self.columns {
            let kept: Vec<NA<String>> = self.data[name]
                .iter()
                .zip(mask)
                .filter(|(_, &keep)| keep)
                .map(|(cell, _)| cell.clone())
                .collect();
            data.insert(name.clone(), kept);
        }
        Ok(DataFrame {
            columns: self.columns.clone(),
            data,
            row_count: mask.iter().filter(|&&keep| keep).count(),
        })
    }

    /// Stack tables vertically
    ///
    /// The result has the union of all columns in first-seen order; cells of
    /// columns a table does not have are NA.
    pub fn concat_rows(frames: &[DataFrame]) -> DataFrame {
        let mut all_columns: Vec<String> = Vec::new();
        for df in frames {
            for col in &df.columns {
                if !all_columns.contains(col) {
                    all_columns.push(col.clone());
                }
            }
        }

        let total_rows: usize = frames.iter().map(|df| df.row_count).sum();
        let mut data: HashMap<String, Vec<NA<String>>> = HashMap::new();
        for col in &all_columns {
            let mut values = Vec::with_capacity(total_rows);
            for df in frames {
                match df.data.get(col) {
                    Some(cells) => values.extend(cells.iter().cloned()),
                    None => values.extend(std::iter::repeat(NA::NA).take(df.row_count)),
                }
            }
            data.insert(col.clone(), values);
        }

        DataFrame {
            columns: all_columns,
            data,
            row_count: total_rows,
        }
    }
}
