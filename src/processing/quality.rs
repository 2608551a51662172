// src/processing/quality.rs
//! Signal quality assessment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_non_empty, EcgResult};
use crate::processing::filters::{butterworth, BandType};
use crate::utils::stats;

/// SNR above which a signal is labelled good.
const GOOD_SNR_THRESHOLD_DB: f32 = 20.0;
/// Content above this frequency counts as noise.
const NOISE_CUTOFF_HZ: f32 = 40.0;
/// Content below this frequency counts as baseline wander.
const BASELINE_CUTOFF_HZ: f32 = 0.5;
/// Butterworth order for both assessment filters.
const ASSESSMENT_FILTER_ORDER: usize = 4;
/// Keeps the SNR ratio defined for silent high bands.
const SNR_EPSILON: f32 = 1e-10;

/// Coarse quality label derived from the SNR estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    /// SNR clears the acceptance threshold.
    Good,
    /// SNR at or below the acceptance threshold.
    Poor,
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Quality measurements for a single signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Estimated signal-to-noise ratio in dB.
    pub snr_db: f32,
    /// Total signal power (variance).
    pub signal_power: f32,
    /// Power of the high-frequency residual.
    pub noise_power: f32,
    /// Peak deviation of the low-frequency trend from its mean.
    pub baseline_wander: f32,
    /// Largest absolute sample value.
    pub max_amplitude: f32,
    /// Coarse label: good iff `snr_db` exceeds 20 dB.
    pub label: QualityLabel,
}

/// Assess a signal at the given sampling rate.
///
/// Noise power comes from a zero-phase highpass above 40 Hz, baseline
/// wander from a zero-phase lowpass below 0.5 Hz. Both cutoffs are clamped
/// below Nyquist so that low sampling rates stay assessable.
pub fn assess_quality(signal: &[f32], sampling_rate: f32) -> EcgResult<QualityMetrics> {
    ensure_non_empty(signal, "assess_quality")?;

    let nyquist = sampling_rate / 2.0;
    let noise_cutoff = clamp_cutoff(NOISE_CUTOFF_HZ, nyquist);
    let baseline_cutoff = clamp_cutoff(BASELINE_CUTOFF_HZ, nyquist);

    let signal_power = stats::variance(signal);

    let mut highpass = butterworth(
        ASSESSMENT_FILTER_ORDER,
        noise_cutoff,
        sampling_rate,
        BandType::Highpass,
    )?;
    let noise_power = stats::variance(&highpass.apply_zero_phase(signal));

    let snr_db = 10.0 * (signal_power / (noise_power + SNR_EPSILON)).log10();

    let mut lowpass = butterworth(
        ASSESSMENT_FILTER_ORDER,
        baseline_cutoff,
        sampling_rate,
        BandType::Lowpass,
    )?;
    let baseline = lowpass.apply_zero_phase(signal);
    let baseline_mean = stats::mean(&baseline);
    let baseline_wander = baseline
        .iter()
        .fold(0.0f32, |acc, &x| acc.max((x - baseline_mean).abs()));

    let label = if snr_db > GOOD_SNR_THRESHOLD_DB {
        QualityLabel::Good
    } else {
        QualityLabel::Poor
    };
    debug!(snr_db, noise_power, baseline_wander, %label, "quality assessed");

    Ok(QualityMetrics {
        snr_db,
        signal_power,
        noise_power,
        baseline_wander,
        max_amplitude: stats::max_abs(signal),
        label,
    })
}

/// Pull a fixed analysis cutoff below Nyquist when the sampling rate is
/// too low for it.
fn clamp_cutoff(preferred: f32, nyquist: f32) -> f32 {
    if preferred < nyquist {
        preferred
    } else {
        nyquist * 0.9
    }
}
