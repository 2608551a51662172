//! ECG signal preprocessing and data augmentation library
//!
//! This library prepares raw single-lead ECG recordings for model training
//! and expands labelled datasets with physiologically plausible variants.
//! It features:
//!
//! - Zero-phase Butterworth bandpass and notch filtering
//! - Wavelet denoising with universal soft thresholding
//! - Fourier resampling to a fixed length and Savitzky-Golay smoothing
//! - Signal quality assessment with SNR and baseline-wander metrics
//! - Ten seedable augmentation transforms with declarative pipelines
//! - Parallel batch preprocessing
//!
//! # Quick Start
//!
//! ```rust
//! use ecg_prep::{Augmenter, PreprocessingConfig, Preprocessor};
//!
//! fn main() -> Result<(), ecg_prep::EcgError> {
//!     // Clean a raw recording.
//!     let config = PreprocessingConfig::default();
//!     let preprocessor = Preprocessor::new(config)?;
//!     let raw: Vec<f32> = (0..2500)
//!         .map(|i| (2.0 * std::f32::consts::PI * 1.2 * i as f32 / 500.0).sin())
//!         .collect();
//!     let cleaned = preprocessor.preprocess(&raw)?;
//!     assert_eq!(cleaned.len(), 5000);
//!
//!     // Derive a reproducible training variant.
//!     let mut augmenter = Augmenter::new(500, Some(42))?;
//!     let variant = augmenter.compose(&cleaned, &Augmenter::default_pipeline());
//!     assert_eq!(variant.len(), cleaned.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod augment;
pub mod batch;
pub mod config;
pub mod error;
pub mod processing;
pub mod utils;

// Re-export commonly used types for convenience
pub use augment::{AugmentationStep, Augmenter, DatasetAugmenter};
pub use batch::{preprocess_batch, preprocess_batch_with_quality};
pub use config::{NormalizationMethod, PreprocessingConfig, WaveletKind};
pub use error::{EcgError, EcgResult};
pub use processing::{Preprocessor, QualityLabel, QualityMetrics};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
