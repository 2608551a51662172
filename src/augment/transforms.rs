// src/augment/transforms.rs
//! Elementary randomized transforms for ECG augmentation.
//!
//! Every transform is label-preserving, keeps the input length, and draws
//! exclusively from the augmenter's own RNG, so a fixed seed reproduces an
//! augmentation run bit for bit.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{EcgError, EcgResult};
use crate::utils::interpolation::{linspace, sample_linear, CubicSpline};
use crate::utils::stats;

/// Circularly rotate a signal; positive shifts move samples toward higher
/// indices. Rolling by `s` and then by `-s` restores the input exactly.
pub fn roll(signal: &[f32], shift: isize) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let mut out = signal.to_vec();
    let k = shift.rem_euclid(n as isize) as usize;
    out.rotate_right(k);
    out
}

/// Randomized signal augmenter with an explicit, seedable random state.
pub struct Augmenter {
    sampling_rate: u32,
    rng: StdRng,
}

impl Augmenter {
    /// Build an augmenter. A `Some` seed gives bit-identical draws across
    /// instances; `None` seeds from OS entropy.
    pub fn new(sampling_rate: u32, seed: Option<u64>) -> EcgResult<Self> {
        if sampling_rate == 0 {
            return Err(EcgError::config("sampling_rate must be positive"));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { sampling_rate, rng })
    }

    /// Sampling rate the time-based transforms assume, in Hz.
    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Additive white noise at a target signal-to-noise ratio.
    ///
    /// Noise power is `mean(x^2) / 10^(snr_db/10)`; at high SNR (100 dB and
    /// up) the transform is a near-identity.
    pub fn add_gaussian_noise(&mut self, signal: &[f32], snr_db: f32) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }
        let signal_power =
            signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32;
        let noise_power = signal_power / 10f32.powf(snr_db / 10.0);
        let sigma = noise_power.sqrt();
        signal
            .iter()
            .map(|&x| x + sigma * self.standard_normal())
            .collect()
    }

    /// Synthetic powerline interference at `freq` Hz.
    ///
    /// The carrier amplitude is `amplitude` times the signal peak, and the
    /// whole carrier is scaled by `sin(phase)` of a random phase draw. The
    /// scaling deliberately modulates amplitude (including sign and
    /// near-cancellation) rather than offsetting the carrier phase.
    pub fn add_powerline_noise(&mut self, signal: &[f32], freq: f32, amplitude: f32) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }
        let peak = stats::max_abs(signal);
        let phase: f32 = self.rng.gen_range(0.0..2.0 * PI);
        let coupling = phase.sin();
        let fs = self.sampling_rate as f32;
        signal
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let t = i as f32 / fs;
                x + amplitude * peak * (2.0 * PI * freq * t).sin() * coupling
            })
            .collect()
    }

    /// Slow sinusoidal drift with random frequency and phase.
    pub fn add_baseline_wander(
        &mut self,
        signal: &[f32],
        freq_range: (f32, f32),
        amplitude: f32,
    ) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }
        let freq = self.uniform_in(freq_range);
        let phase: f32 = self.rng.gen_range(0.0..2.0 * PI);
        let peak = stats::max_abs(signal);
        let fs = self.sampling_rate as f32;
        signal
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let t = i as f32 / fs;
                x + amplitude * peak * (2.0 * PI * freq * t + phase).sin()
            })
            .collect()
    }

    /// Smooth random distortion of the time axis.
    ///
    /// Evenly spaced knots get Gaussian position offsets scaled by
    /// `sigma * len / knots`; a cubic spline through the perturbed knots
    /// maps each output index to a warped position, and the output samples
    /// the original signal there by linear interpolation. Warped positions
    /// are clipped into the valid index range.
    pub fn time_warp(&mut self, signal: &[f32], sigma: f32) -> Vec<f32> {
        let n = signal.len();
        if n < 2 {
            return signal.to_vec();
        }
        let max_idx = (n - 1) as f32;
        let (positions, num_knots) = self.warp_knots(n);
        let scale = sigma * n as f32 / num_knots as f32;
        let values: Vec<f32> = positions
            .iter()
            .map(|&p| (p + self.standard_normal() * scale).clamp(0.0, max_idx))
            .collect();

        let Ok(spline) = CubicSpline::new(&positions, &values) else {
            return signal.to_vec();
        };
        (0..n)
            .map(|i| {
                let warped = spline.evaluate(i as f32).clamp(0.0, max_idx);
                sample_linear(signal, warped)
            })
            .collect()
    }

    /// Smooth random distortion of the amplitude axis.
    ///
    /// Same knot layout as [`time_warp`](Self::time_warp); per-knot factors
    /// are `1 + randn * sigma` and the interpolated factor curve multiplies
    /// the signal pointwise.
    pub fn magnitude_warp(&mut self, signal: &[f32], sigma: f32) -> Vec<f32> {
        let n = signal.len();
        if n < 2 {
            return signal.to_vec();
        }
        let (positions, _) = self.warp_knots(n);
        let values: Vec<f32> = positions
            .iter()
            .map(|_| 1.0 + self.standard_normal() * sigma)
            .collect();

        let Ok(spline) = CubicSpline::new(&positions, &values) else {
            return signal.to_vec();
        };
        signal
            .iter()
            .enumerate()
            .map(|(i, &x)| x * spline.evaluate(i as f32))
            .collect()
    }

    /// Multiply the whole signal by one factor drawn uniformly from
    /// `range`. A degenerate range pins the factor to its lower bound, so
    /// `(1.0, 1.0)` is an exact identity.
    pub fn amplitude_scale(&mut self, signal: &[f32], range: (f32, f32)) -> Vec<f32> {
        let factor = self.uniform_in(range);
        signal.iter().map(|&x| x * factor).collect()
    }

    /// Circular shift by a random offset in `[-max_shift, max_shift)`.
    ///
    /// `None` defaults the bound to a tenth of the signal length. A zero
    /// bound returns the input unchanged.
    pub fn time_shift(&mut self, signal: &[f32], max_shift: Option<usize>) -> Vec<f32> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }
        let max_shift = max_shift.unwrap_or(n / 10);
        if max_shift == 0 {
            return signal.to_vec();
        }
        let bound = max_shift as isize;
        let shift = self.rng.gen_range(-bound..bound);
        roll(signal, shift)
    }

    /// Zero out one random run of samples.
    ///
    /// The run length is `len * max_mask_ratio` shrunk by a uniform factor
    /// in `[0.5, 1.0)` and clamped below the signal length; the start is
    /// uniform over positions where the run still fits.
    pub fn time_mask(&mut self, signal: &[f32], max_mask_ratio: f32) -> Vec<f32> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }
        let shrink = self.uniform_in((0.5, 1.0));
        let mask_len = ((n as f32 * max_mask_ratio * shrink) as usize).min(n - 1);
        let start = self.rng.gen_range(0..n - mask_len);
        let mut out = signal.to_vec();
        out[start..start + mask_len].fill(0.0);
        out
    }

    /// Shift all frequency content by a random offset in
    /// `[-max_shift_hz, max_shift_hz)`.
    ///
    /// Builds the analytic signal with an FFT Hilbert transform and
    /// advances its instantaneous phase by a linear ramp, which preserves
    /// the amplitude envelope.
    pub fn frequency_shift(&mut self, signal: &[f32], max_shift_hz: f32) -> Vec<f32> {
        let n = signal.len();
        let shift = self.uniform_in((-max_shift_hz, max_shift_hz));
        if n < 2 {
            return signal.to_vec();
        }

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(n);
        let mut spectrum: Vec<Complex<f32>> = signal
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        forward.process(&mut spectrum);

        // Analytic-signal multiplier: keep DC (and the Nyquist bin for even
        // lengths), double the positive bins, zero the negative half.
        let half = n / 2;
        let positive_end = if n % 2 == 0 { half } else { half + 1 };
        for bin in spectrum.iter_mut().take(positive_end).skip(1) {
            *bin = *bin * 2.0;
        }
        for bin in spectrum.iter_mut().skip(half + 1) {
            *bin = Complex::new(0.0, 0.0);
        }

        let inverse = planner.plan_fft_inverse(n);
        inverse.process(&mut spectrum);

        let fs = self.sampling_rate as f32;
        let scale = 1.0 / n as f32;
        spectrum
            .iter()
            .enumerate()
            .map(|(i, analytic)| {
                let angle = 2.0 * PI * shift * i as f32 / fs;
                (analytic * Complex::from_polar(1.0, angle)).re * scale
            })
            .collect()
    }

    /// Keep a random contiguous fraction of the signal and restore the
    /// original length by replicating the edge samples, split evenly
    /// between both ends.
    pub fn random_crop(&mut self, signal: &[f32], crop_ratio: f32) -> Vec<f32> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }
        let crop_len = ((n as f32 * crop_ratio) as usize).clamp(1, n);
        if crop_len == n {
            return signal.to_vec();
        }
        let start = self.rng.gen_range(0..n - crop_len);
        let cropped = &signal[start..start + crop_len];

        let pad_left = (n - crop_len) / 2;
        let pad_right = n - crop_len - pad_left;
        let mut out = Vec::with_capacity(n);
        out.extend(std::iter::repeat(cropped[0]).take(pad_left));
        out.extend_from_slice(cropped);
        out.extend(std::iter::repeat(cropped[crop_len - 1]).take(pad_right));
        out
    }

    /// Knot positions shared by the warp transforms: at least three knots,
    /// roughly one per second of signal.
    fn warp_knots(&self, n: usize) -> (Vec<f32>, usize) {
        let num_knots = (n / self.sampling_rate as usize).max(3);
        (linspace(0.0, (n - 1) as f32, num_knots), num_knots)
    }

    /// Standard normal draw via the Box-Muller transform.
    fn standard_normal(&mut self) -> f32 {
        let u1: f32 = self.rng.gen::<f32>().max(1e-10);
        let u2: f32 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Uniform draw over `[range.0, range.1)`, tolerating degenerate
    /// ranges by pinning to the lower bound.
    fn uniform_in(&mut self, range: (f32, f32)) -> f32 {
        let u: f32 = self.rng.gen();
        range.0 + (range.1 - range.0) * u
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl std::fmt::Debug for Augmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Augmenter")
            .field("sampling_rate", &self.sampling_rate)
            .finish_non_exhaustive()
    }
}
