// src/config/preprocessing.rs
//! Preprocessing pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EcgError, EcgResult};

/// Normalization strategy applied after denoising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    /// Zero mean, unit variance.
    ZScore,
    /// Rescale into [0, 1].
    MinMax,
    /// Median-centered, scaled by interquartile range.
    Robust,
}

/// Orthonormal wavelet family used for denoising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveletKind {
    /// 2-tap Haar wavelet.
    Haar,
    /// 4-tap Daubechies wavelet.
    Db2,
    /// 8-tap Daubechies wavelet.
    Db4,
    /// 8-tap symlet.
    Sym4,
}

/// Immutable configuration for the preprocessing pipeline.
///
/// Missing keys take their defaults when loaded from TOML; unknown
/// enumeration tags fail at parse time rather than being silently
/// substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Sampling rate of incoming signals in Hz.
    pub sampling_rate: u32,
    /// Output length every preprocessed signal is resampled to.
    pub target_length: usize,
    /// Bandpass lower cutoff in Hz.
    pub lowcut: f32,
    /// Bandpass upper cutoff in Hz.
    pub highcut: f32,
    /// Butterworth section order for each bandpass edge.
    pub filter_order: usize,
    /// Wavelet family for denoising.
    pub wavelet: WaveletKind,
    /// Decomposition depth for wavelet denoising.
    pub wavelet_level: usize,
    /// Powerline notch center frequency in Hz.
    pub notch_freq: f32,
    /// Notch quality factor (center frequency over bandwidth).
    pub notch_quality: f32,
    /// Normalization method.
    pub normalization: NormalizationMethod,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500,
            target_length: 5000,
            lowcut: 0.5,
            highcut: 45.0,
            filter_order: 4,
            wavelet: WaveletKind::Db4,
            wavelet_level: 4,
            notch_freq: 50.0,
            notch_quality: 30.0,
            normalization: NormalizationMethod::ZScore,
        }
    }
}

impl PreprocessingConfig {
    /// Nyquist frequency for the configured sampling rate.
    pub fn nyquist(&self) -> f32 {
        self.sampling_rate as f32 / 2.0
    }

    /// Check every field against its allowed range.
    ///
    /// Components refuse to construct with an invalid configuration, so a
    /// failure here is surfaced before any signal is touched.
    pub fn validate(&self) -> EcgResult<()> {
        if self.sampling_rate == 0 {
            return Err(EcgError::config("sampling_rate must be positive"));
        }
        if self.target_length == 0 {
            return Err(EcgError::config("target_length must be positive"));
        }
        if self.lowcut <= 0.0 {
            return Err(EcgError::config("lowcut must be positive"));
        }
        if self.highcut <= self.lowcut {
            return Err(EcgError::config("highcut must be above lowcut"));
        }
        if self.highcut >= self.nyquist() {
            return Err(EcgError::config(format!(
                "highcut {} Hz must be below the Nyquist frequency {} Hz",
                self.highcut,
                self.nyquist()
            )));
        }
        if self.filter_order == 0 {
            return Err(EcgError::config("filter_order must be positive"));
        }
        if self.wavelet_level == 0 {
            return Err(EcgError::config("wavelet_level must be positive"));
        }
        if self.notch_freq <= 0.0 || self.notch_freq >= self.nyquist() {
            return Err(EcgError::config(format!(
                "notch_freq {} Hz must lie between 0 and the Nyquist frequency {} Hz",
                self.notch_freq,
                self.nyquist()
            )));
        }
        if self.notch_quality <= 0.0 {
            return Err(EcgError::config("notch_quality must be positive"));
        }
        Ok(())
    }

    /// Load a configuration from a TOML file, fill missing keys with
    /// defaults, and validate the result.
    pub fn from_toml_path(path: impl AsRef<Path>) -> EcgResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| EcgError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| EcgError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}
