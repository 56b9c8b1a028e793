//! Common test utilities module
//!
//! Provides shared utilities for tests including:
//! - Temporary dataset directories with cleanup
//! - Writers for regional and national CSV layouts

pub mod test_utils;

#[allow(unused_imports)]
pub use test_utils::{
    day_first, get_temp_dir, month_ends, national_csv, regional_csv, test_temp_dir, TempTestDir,
    RATE_HEADER,
};
