// src/processing/mod.rs
//! Signal conditioning pipeline for ECG data.

pub mod filters;
pub mod preprocessor;
pub mod quality;
pub mod resample;
pub mod smoothing;
pub mod wavelet;

pub use preprocessor::Preprocessor;
pub use quality::{QualityLabel, QualityMetrics};
pub use resample::resample;
pub use smoothing::savitzky_golay;
pub use wavelet::WaveletDenoiser;
