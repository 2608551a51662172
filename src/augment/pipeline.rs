// src/augment/pipeline.rs
//! Declarative augmentation pipelines.
//!
//! An [`AugmentationStep`] names one transform with its parameters and
//! serializes to a tagged map, so pipelines can live in config files and be
//! reported alongside training runs. [`Augmenter::compose`] applies a step
//! list stochastically; [`DatasetAugmenter`] expands a labelled dataset by
//! a fixed factor.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::transforms::Augmenter;
use crate::error::{EcgError, EcgResult};

/// One parameterized transform in an augmentation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transform", rename_all = "snake_case")]
pub enum AugmentationStep {
    /// Additive white noise at `snr_db` decibels.
    GaussianNoise { snr_db: f32 },
    /// Mains interference at `freq` Hz with relative `amplitude`.
    PowerlineNoise { freq: f32, amplitude: f32 },
    /// Sinusoidal drift with frequency drawn from `freq_range`.
    BaselineWander { freq_range: (f32, f32), amplitude: f32 },
    /// Smooth time-axis distortion of strength `sigma`.
    TimeWarp { sigma: f32 },
    /// Smooth amplitude distortion of strength `sigma`.
    MagnitudeWarp { sigma: f32 },
    /// Uniform scaling with a factor drawn from `range`.
    AmplitudeScale { range: (f32, f32) },
    /// Circular shift bounded by `max_shift` samples (`None`: a tenth of
    /// the signal length).
    TimeShift { max_shift: Option<usize> },
    /// Zeroed run covering at most `max_mask_ratio` of the signal.
    TimeMask { max_mask_ratio: f32 },
    /// Spectral shift of at most `max_shift_hz` either way.
    FrequencyShift { max_shift_hz: f32 },
    /// Edge-padded random crop keeping `crop_ratio` of the samples.
    RandomCrop { crop_ratio: f32 },
}

impl Augmenter {
    /// Apply a single pipeline step.
    pub fn apply(&mut self, signal: &[f32], step: &AugmentationStep) -> Vec<f32> {
        match *step {
            AugmentationStep::GaussianNoise { snr_db } => self.add_gaussian_noise(signal, snr_db),
            AugmentationStep::PowerlineNoise { freq, amplitude } => {
                self.add_powerline_noise(signal, freq, amplitude)
            }
            AugmentationStep::BaselineWander {
                freq_range,
                amplitude,
            } => self.add_baseline_wander(signal, freq_range, amplitude),
            AugmentationStep::TimeWarp { sigma } => self.time_warp(signal, sigma),
            AugmentationStep::MagnitudeWarp { sigma } => self.magnitude_warp(signal, sigma),
            AugmentationStep::AmplitudeScale { range } => self.amplitude_scale(signal, range),
            AugmentationStep::TimeShift { max_shift } => self.time_shift(signal, max_shift),
            AugmentationStep::TimeMask { max_mask_ratio } => {
                self.time_mask(signal, max_mask_ratio)
            }
            AugmentationStep::FrequencyShift { max_shift_hz } => {
                self.frequency_shift(signal, max_shift_hz)
            }
            AugmentationStep::RandomCrop { crop_ratio } => self.random_crop(signal, crop_ratio),
        }
    }

    /// Run a pipeline stochastically: each step fires only when an
    /// independent uniform draw exceeds one half, so every pass yields a
    /// different composition of the listed transforms.
    pub fn compose(&mut self, signal: &[f32], steps: &[AugmentationStep]) -> Vec<f32> {
        let mut augmented = signal.to_vec();
        let mut applied = 0usize;
        for step in steps {
            let coin: f32 = self.rng_mut().gen();
            if coin > 0.5 {
                augmented = self.apply(&augmented, step);
                applied += 1;
            }
        }
        debug!(applied, total = steps.len(), "composed augmentation pipeline");
        augmented
    }

    /// The conventional pipeline for ECG training-set expansion: mild
    /// noise, a gentle warp, a small gain jitter, and a shift.
    pub fn default_pipeline() -> Vec<AugmentationStep> {
        vec![
            AugmentationStep::GaussianNoise { snr_db: 25.0 },
            AugmentationStep::TimeWarp { sigma: 0.1 },
            AugmentationStep::AmplitudeScale { range: (0.9, 1.1) },
            AugmentationStep::TimeShift { max_shift: None },
        ]
    }
}

/// Expands a labelled dataset by a fixed factor, keeping each original
/// alongside its stochastically augmented variants.
#[derive(Debug)]
pub struct DatasetAugmenter {
    augmenter: Augmenter,
    factor: usize,
}

impl DatasetAugmenter {
    /// Wrap an augmenter; `factor` counts the original, so it must be at
    /// least one.
    pub fn new(augmenter: Augmenter, factor: usize) -> EcgResult<Self> {
        if factor == 0 {
            return Err(EcgError::config("augmentation factor must be at least 1"));
        }
        Ok(Self { augmenter, factor })
    }

    /// Output records per input record.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Expand `dataset` to `factor` records per input: the original first,
    /// then `factor - 1` variants produced by the default pipeline. Labels
    /// are cloned onto every variant.
    pub fn augment_dataset<L: Clone>(&mut self, dataset: &[(Vec<f32>, L)]) -> Vec<(Vec<f32>, L)> {
        let pipeline = Augmenter::default_pipeline();
        let mut out = Vec::with_capacity(dataset.len() * self.factor);
        for (signal, label) in dataset {
            out.push((signal.clone(), label.clone()));
            for _ in 1..self.factor {
                let variant = self.augmenter.compose(signal, &pipeline);
                out.push((variant, label.clone()));
            }
        }
        info!(
            inputs = dataset.len(),
            factor = self.factor,
            outputs = out.len(),
            "augmented dataset"
        );
        out
    }
}
