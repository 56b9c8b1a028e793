use csv::{ReaderBuilder, Writer};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;

/// Field contents read as missing, compared after trimming
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "#N/A", "#NA", "<NA>",
    "None", "-1.#IND", "1.#QNAN",
];

/// Read a CSV file into a raw string table
///
/// The first record is the header. Fields are kept verbatim (untrimmed) so
/// that normalisation stays a preprocessing concern; NA tokens become
/// `NA::NA`. Duplicate header names are disambiguated as `X`, `X.1`, `X.2`.
pub fn read_raw_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(file);

    let raw_headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let headers = mangle_duplicate_headers(&raw_headers);

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(record.iter().map(parse_cell).collect());
    }

    log::debug!(
        "read {} rows x {} columns from {}",
        records.len(),
        headers.len(),
        path.as_ref().display()
    );
    DataFrame::from_records(headers, records)
}

/// Map a raw field to a cell
pub fn parse_cell(field: &str) -> NA<String> {
    if NA_TOKENS.contains(&field.trim()) {
        NA::NA
    } else {
        NA::Value(field.to_string())
    }
}

/// Disambiguate repeated header names with `.1`, `.2`, ... suffixes
pub fn mangle_duplicate_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        if seen.contains(&name) {
            let count = counts.entry(header.clone()).or_insert(0);
            loop {
                *count += 1;
                let candidate = format!("{}.{}", header, count);
                if !seen.contains(&candidate) {
                    name = candidate;
                    break;
                }
            }
        }
        seen.insert(name.clone());
        result.push(name);
    }
    result
}

/// Write a header and string rows as CSV
pub fn write_table<P, I>(path: P, header: &[&str], rows: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Vec<String>>,
{
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
