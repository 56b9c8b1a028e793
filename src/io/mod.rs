pub mod csv;

pub use self::csv::{read_raw_csv, write_table};
