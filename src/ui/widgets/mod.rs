//! Custom widgets

pub mod sparkline;

pub use sparkline::{value_range, SeriesSparkline};
