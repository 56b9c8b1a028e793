//! Time series analysis
//!
//! Classical additive decomposition of a regularly spaced series into
//! trend, seasonal and residual components.

pub mod decomposition;

pub use decomposition::{DecompositionResult, SeasonalDecomposition};
