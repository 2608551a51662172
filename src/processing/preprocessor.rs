// src/processing/preprocessor.rs
//! The preprocessing pipeline: bandpass, notch, wavelet denoise,
//! normalize, resample.

use tracing::{debug, info};

use crate::config::{NormalizationMethod, PreprocessingConfig};
use crate::error::{ensure_non_empty, EcgResult};
use crate::processing::filters::{bandpass, notch};
use crate::processing::quality::{assess_quality, QualityMetrics};
use crate::processing::resample::resample;
use crate::processing::smoothing;
use crate::processing::wavelet::WaveletDenoiser;
use crate::utils::stats;

/// Division guard for the normalization denominators.
const NORMALIZATION_EPSILON: f32 = 1e-8;

/// Deterministic conditioning pipeline for raw ECG signals.
///
/// The configuration is validated once at construction and immutable
/// afterwards; every method takes `&self` and keeps per-call filter state
/// local, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessingConfig,
    denoiser: WaveletDenoiser,
}

impl Preprocessor {
    /// Build a preprocessor, failing fast on an invalid configuration.
    pub fn new(config: PreprocessingConfig) -> EcgResult<Self> {
        config.validate()?;
        let denoiser = WaveletDenoiser::new(config.wavelet, config.wavelet_level)?;
        Ok(Self { config, denoiser })
    }

    /// Active configuration.
    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Zero-phase Butterworth bandpass between the configured cutoffs.
    pub fn bandpass_filter(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        ensure_non_empty(signal, "bandpass_filter")?;
        let mut cascade = bandpass(
            self.config.filter_order,
            self.config.lowcut,
            self.config.highcut,
            self.config.sampling_rate as f32,
        )?;
        Ok(cascade.apply_zero_phase(signal))
    }

    /// Zero-phase notch at the configured powerline frequency.
    pub fn remove_powerline_noise(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        ensure_non_empty(signal, "remove_powerline_noise")?;
        let mut cascade = notch(
            self.config.notch_freq,
            self.config.notch_quality,
            self.config.sampling_rate as f32,
        )?;
        Ok(cascade.apply_zero_phase(signal))
    }

    /// Wavelet-threshold denoising with the configured family and depth.
    pub fn wavelet_denoising(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        self.denoiser.denoise(signal)
    }

    /// Normalize with the configured method.
    ///
    /// All three methods share an epsilon-stabilized denominator, so
    /// constant signals map to zero rather than failing.
    pub fn normalize(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        ensure_non_empty(signal, "normalize")?;
        let out = match self.config.normalization {
            NormalizationMethod::ZScore => {
                let mean = stats::mean(signal);
                let denom = stats::std_dev(signal) + NORMALIZATION_EPSILON;
                signal.iter().map(|&x| (x - mean) / denom).collect()
            }
            NormalizationMethod::MinMax => {
                let min = stats::min_value(signal);
                let denom = stats::max_value(signal) - min + NORMALIZATION_EPSILON;
                signal.iter().map(|&x| (x - min) / denom).collect()
            }
            NormalizationMethod::Robust => {
                let median = stats::median(signal);
                let denom = stats::iqr(signal) + NORMALIZATION_EPSILON;
                signal.iter().map(|&x| (x - median) / denom).collect()
            }
        };
        Ok(out)
    }

    /// Fourier resampling to the configured target length.
    pub fn resample_signal(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        resample(signal, self.config.target_length)
    }

    /// Savitzky-Golay smoothing with the default window and order.
    ///
    /// Not part of [`preprocess`](Self::preprocess); offered for callers
    /// that want extra smoothing on top of the pipeline.
    pub fn savgol_smooth(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        smoothing::savitzky_golay(
            signal,
            smoothing::DEFAULT_WINDOW,
            smoothing::DEFAULT_POLYORDER,
        )
    }

    /// Savitzky-Golay smoothing with explicit window and polynomial order.
    pub fn savgol_smooth_custom(
        &self,
        signal: &[f32],
        window: usize,
        polyorder: usize,
    ) -> EcgResult<Vec<f32>> {
        smoothing::savitzky_golay(signal, window, polyorder)
    }

    /// Quality metrics for a signal at the configured sampling rate.
    pub fn assess_quality(&self, signal: &[f32]) -> EcgResult<QualityMetrics> {
        assess_quality(signal, self.config.sampling_rate as f32)
    }

    /// Run the full pipeline; output length always equals `target_length`.
    pub fn preprocess(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        ensure_non_empty(signal, "preprocess")?;
        info!(input_len = signal.len(), "preprocessing signal");

        let filtered = self.bandpass_filter(signal)?;
        debug!(stage = "bandpass", len = filtered.len());
        let notched = self.remove_powerline_noise(&filtered)?;
        debug!(stage = "notch", len = notched.len());
        let denoised = self.wavelet_denoising(&notched)?;
        debug!(stage = "wavelet", len = denoised.len());
        let normalized = self.normalize(&denoised)?;
        debug!(stage = "normalize", len = normalized.len());
        let resampled = self.resample_signal(&normalized)?;

        info!(output_len = resampled.len(), "preprocessing complete");
        Ok(resampled)
    }

    /// Run the full pipeline and assess quality on the final signal.
    pub fn preprocess_with_quality(
        &self,
        signal: &[f32],
    ) -> EcgResult<(Vec<f32>, QualityMetrics)> {
        let processed = self.preprocess(signal)?;
        let metrics = self.assess_quality(&processed)?;
        Ok((processed, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WaveletKind;
    use std::f32::consts::PI;

    fn sine(freq: f32, sample_rate: f32, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    fn default_preprocessor() -> Preprocessor {
        Preprocessor::new(PreprocessingConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = PreprocessingConfig::default();
        config.lowcut = 60.0;
        config.highcut = 45.0;
        assert!(Preprocessor::new(config).is_err());
    }

    #[test]
    fn test_preprocess_hits_target_length() {
        let preprocessor = default_preprocessor();
        for len in [1000usize, 4999, 5000, 5001, 8000] {
            let out = preprocessor.preprocess(&sine(8.0, 500.0, len)).unwrap();
            assert_eq!(out.len(), 5000, "input length {len}");
        }
    }

    #[test]
    fn test_zscore_normalization() {
        let preprocessor = default_preprocessor();
        let out = preprocessor.normalize(&sine(8.0, 500.0, 2000)).unwrap();
        assert!(stats::mean(&out).abs() < 1e-5);
        assert!((stats::std_dev(&out) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zscore_is_idempotent() {
        let preprocessor = default_preprocessor();
        let once = preprocessor.normalize(&sine(3.0, 500.0, 1500)).unwrap();
        let twice = preprocessor.normalize(&once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_minmax_normalization_bounds() {
        let mut config = PreprocessingConfig::default();
        config.normalization = NormalizationMethod::MinMax;
        let preprocessor = Preprocessor::new(config).unwrap();
        let out = preprocessor.normalize(&sine(8.0, 500.0, 2000)).unwrap();
        let min = stats::min_value(&out);
        let max = stats::max_value(&out);
        assert!(min >= 0.0 && min < 1e-6);
        assert!(max <= 1.0 && max > 0.999);
    }

    #[test]
    fn test_minmax_is_idempotent() {
        let mut config = PreprocessingConfig::default();
        config.normalization = NormalizationMethod::MinMax;
        let preprocessor = Preprocessor::new(config).unwrap();
        let once = preprocessor.normalize(&sine(3.0, 500.0, 1500)).unwrap();
        let twice = preprocessor.normalize(&once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_robust_normalization_centers_median() {
        let mut config = PreprocessingConfig::default();
        config.normalization = NormalizationMethod::Robust;
        let preprocessor = Preprocessor::new(config).unwrap();
        let signal: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin() + 5.0).collect();
        let out = preprocessor.normalize(&signal).unwrap();
        assert!(stats::median(&out).abs() < 1e-4);
    }

    #[test]
    fn test_constant_signal_normalizes_to_zero() {
        let preprocessor = default_preprocessor();
        let out = preprocessor.normalize(&vec![4.2f32; 100]).unwrap();
        for value in &out {
            assert!(value.abs() < 1e-6);
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_stage_methods_reject_empty_input() {
        let preprocessor = default_preprocessor();
        assert!(preprocessor.bandpass_filter(&[]).is_err());
        assert!(preprocessor.remove_powerline_noise(&[]).is_err());
        assert!(preprocessor.wavelet_denoising(&[]).is_err());
        assert!(preprocessor.normalize(&[]).is_err());
        assert!(preprocessor.resample_signal(&[]).is_err());
        assert!(preprocessor.preprocess(&[]).is_err());
    }

    #[test]
    fn test_notch_stage_removes_powerline_tone() {
        let preprocessor = default_preprocessor();
        let contaminated: Vec<f32> = sine(8.0, 500.0, 4000)
            .iter()
            .zip(sine(50.0, 500.0, 4000).iter())
            .map(|(a, b)| a + 0.5 * b)
            .collect();
        let out = preprocessor.remove_powerline_noise(&contaminated).unwrap();
        let clean = sine(8.0, 500.0, 4000);
        let mid_err: f32 = out[1000..3000]
            .iter()
            .zip(&clean[1000..3000])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max);
        assert!(mid_err < 0.1, "residual powerline {mid_err}");
    }

    #[test]
    fn test_custom_wavelet_config_flows_through() {
        let mut config = PreprocessingConfig::default();
        config.wavelet = WaveletKind::Sym4;
        config.wavelet_level = 2;
        let preprocessor = Preprocessor::new(config).unwrap();
        let out = preprocessor
            .wavelet_denoising(&sine(8.0, 500.0, 1000))
            .unwrap();
        assert_eq!(out.len(), 1000);
    }

    #[test]
    fn test_preprocess_with_quality() {
        let preprocessor = default_preprocessor();
        let (out, metrics) = preprocessor
            .preprocess_with_quality(&sine(8.0, 500.0, 4000))
            .unwrap();
        assert_eq!(out.len(), 5000);
        assert!(metrics.snr_db.is_finite());
        // Z-scored output has unit variance by construction.
        assert!((metrics.signal_power - 1.0).abs() < 0.1);
    }
}
