//! Regional unemployment insights
//!
//! Loads regional unemployment-rate CSV files, cleans and merges them, and
//! writes a fixed set of charts and one summary table: the national trend,
//! the regions with the highest latest rates, a pre/during disruption
//! comparison, monthly seasonality and additive decompositions.

pub mod config;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod io;
pub mod loader;
pub mod na;
pub mod pipeline;
pub mod pivot;
pub mod preprocess;
pub mod report;
pub mod stats;
pub mod temporal;
pub mod time_series;
pub mod vis;

// Re-export commonly used types
pub use config::Config;
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use groupby::GroupBy;
pub use na::NA;
pub use pipeline::{run, PipelineReport};
pub use preprocess::{CleanTable, Observation};
pub use temporal::TimeSeries;
