// src/utils/mod.rs
//! Shared numeric helpers: descriptive statistics and interpolation.

pub mod interpolation;
pub mod stats;

pub use interpolation::{linspace, sample_linear, CubicSpline};
pub use stats::{iqr, max_abs, mean, median, percentile, std_dev, variance};
