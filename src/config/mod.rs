// src/config/mod.rs
//! Configuration types for the preprocessing pipeline.

pub mod preprocessing;

pub use preprocessing::{NormalizationMethod, PreprocessingConfig, WaveletKind};
