//! Chart rendering
//!
//! PNG charts drawn with plotters through the bitmap backend. Titles, tick
//! labels and legends use the system sans-serif font.

pub mod plotters_ext;

pub use self::plotters_ext::{
    histogram_bins, plot_bars, plot_date_lines, plot_decomposition, plot_heatmap,
    plot_histogram, rocket_color, DateSeries, PlotSettings,
};
