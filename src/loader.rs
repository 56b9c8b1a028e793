//! Input discovery and loading

use log::{debug, info};

use crate::config::Config;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::io::read_raw_csv;

/// Read every configured input file that exists and stack them
///
/// Absent files are skipped. Columns are unioned across files in first-seen
/// order, so a column one file lacks is NA for that file's rows.
pub fn load_data(config: &Config) -> Result<DataFrame> {
    let mut frames = Vec::new();

    for path in config.input_paths() {
        if !path.is_file() {
            debug!("input file {} not found, skipping", path.display());
            continue;
        }
        frames.push(read_raw_csv(&path)?);
    }

    if frames.is_empty() {
        return Err(Error::NoDataFound(format!(
            "none of {:?} found in {}",
            config.input_files,
            config.data_dir.display()
        )));
    }

    let df = DataFrame::concat_rows(&frames);
    info!(
        "loaded {} rows from {} file(s), {} columns",
        df.row_count(),
        frames.len(),
        df.column_names().len()
    );
    Ok(df)
}
