// src/processing/wavelet.rs
//! Wavelet-threshold denoising.
//!
//! Multi-level periodized DWT with an orthonormal filter bank; detail bands
//! are soft-thresholded at the universal threshold estimated from the finest
//! band, then the signal is rebuilt by the adjoint transform and truncated
//! to the exact input length.

use tracing::debug;

use crate::config::WaveletKind;
use crate::error::{ensure_non_empty, EcgError, EcgResult};
use crate::utils::stats;

/// Orthonormal scaling filter taps for each supported family.
fn scaling_filter(kind: WaveletKind) -> &'static [f32] {
    match kind {
        WaveletKind::Haar => &[std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2],
        WaveletKind::Db2 => &[
            0.482_962_91,
            0.836_516_30,
            0.224_143_87,
            -0.129_409_52,
        ],
        WaveletKind::Db4 => &[
            0.230_377_81,
            0.714_846_57,
            0.630_880_77,
            -0.027_983_77,
            -0.187_034_81,
            0.030_841_38,
            0.032_883_01,
            -0.010_597_40,
        ],
        WaveletKind::Sym4 => &[
            -0.075_765_71,
            -0.029_635_53,
            0.497_618_67,
            0.803_738_75,
            0.297_857_80,
            -0.099_219_54,
            -0.012_603_97,
            0.032_223_10,
        ],
    }
}

/// Quadrature mirror highpass derived from the scaling filter.
fn qmf_highpass(lowpass: &[f32]) -> Vec<f32> {
    let len = lowpass.len();
    (0..len)
        .map(|j| {
            let tap = lowpass[len - 1 - j];
            if j % 2 == 0 {
                tap
            } else {
                -tap
            }
        })
        .collect()
}

/// One analysis step over an even-length signal: circular stride-2
/// convolution with both filters.
fn dwt_periodic(signal: &[f32], lowpass: &[f32], highpass: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let n = signal.len();
    let half = n / 2;
    let mut approx = vec![0.0f32; half];
    let mut detail = vec![0.0f32; half];
    for k in 0..half {
        let mut a = 0.0f32;
        let mut d = 0.0f32;
        for j in 0..lowpass.len() {
            let idx = (2 * k + j) % n;
            a += lowpass[j] * signal[idx];
            d += highpass[j] * signal[idx];
        }
        approx[k] = a;
        detail[k] = d;
    }
    (approx, detail)
}

/// One synthesis step; exact adjoint of [`dwt_periodic`], so a
/// decompose-reconstruct round trip reproduces the input.
fn idwt_periodic(approx: &[f32], detail: &[f32], lowpass: &[f32], highpass: &[f32]) -> Vec<f32> {
    let half = approx.len();
    let n = 2 * half;
    let mut out = vec![0.0f32; n];
    for k in 0..half {
        for j in 0..lowpass.len() {
            let idx = (2 * k + j) % n;
            out[idx] += lowpass[j] * approx[k] + highpass[j] * detail[k];
        }
    }
    out
}

fn soft_threshold(value: f32, threshold: f32) -> f32 {
    value.signum() * (value.abs() - threshold).max(0.0)
}

/// Wavelet denoiser with a fixed family and decomposition depth.
#[derive(Debug, Clone)]
pub struct WaveletDenoiser {
    wavelet: WaveletKind,
    level: usize,
}

impl WaveletDenoiser {
    /// Build a denoiser. `level` must be at least 1.
    pub fn new(wavelet: WaveletKind, level: usize) -> EcgResult<Self> {
        if level == 0 {
            return Err(EcgError::config("wavelet level must be positive"));
        }
        Ok(Self { wavelet, level })
    }

    /// Denoise a signal; the output has exactly the input length.
    ///
    /// Levels whose input would drop below two samples are skipped, so the
    /// effective depth shrinks deterministically for short signals. Odd
    /// level lengths are extended by repeating the final sample and the
    /// pre-extension length is restored on the way back.
    pub fn denoise(&self, signal: &[f32]) -> EcgResult<Vec<f32>> {
        ensure_non_empty(signal, "wavelet_denoising")?;
        let n = signal.len();
        if n < 2 {
            return Ok(signal.to_vec());
        }

        let lowpass = scaling_filter(self.wavelet);
        let highpass = qmf_highpass(lowpass);

        // Analysis: details[0] is the finest band.
        let mut approx = signal.to_vec();
        let mut details: Vec<Vec<f32>> = Vec::new();
        let mut level_lengths: Vec<usize> = Vec::new();
        for _ in 0..self.level {
            if approx.len() < 2 {
                break;
            }
            level_lengths.push(approx.len());
            if approx.len() % 2 == 1 {
                let last = approx[approx.len() - 1];
                approx.push(last);
            }
            let (next_approx, detail) = dwt_periodic(&approx, lowpass, &highpass);
            details.push(detail);
            approx = next_approx;
        }

        if details.is_empty() {
            return Ok(signal.to_vec());
        }

        // Universal threshold from the MAD estimate of the finest band.
        let finest_abs: Vec<f32> = details[0].iter().map(|d| d.abs()).collect();
        let sigma = stats::median(&finest_abs) / 0.6745;
        let threshold = sigma * (2.0 * (n as f32).ln()).sqrt();
        debug!(
            levels = details.len(),
            sigma, threshold, "wavelet thresholding"
        );

        for band in &mut details {
            for value in band.iter_mut() {
                *value = soft_threshold(*value, threshold);
            }
        }

        // Synthesis from coarsest to finest, trimming each level back to
        // its pre-extension length.
        let mut current = approx;
        for (detail, &orig_len) in details.iter().zip(level_lengths.iter()).rev() {
            let mut rebuilt = idwt_periodic(&current, detail, lowpass, &highpass);
            rebuilt.truncate(orig_len);
            current = rebuilt;
        }

        Ok(current)
    }
}
