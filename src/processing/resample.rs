// src/processing/resample.rs
//! Fourier-domain resampling to a fixed output length.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{ensure_non_empty, EcgError, EcgResult};

/// Resample a signal to `target_len` samples through the frequency domain.
///
/// The spectrum is truncated (downsampling) or zero-padded (upsampling)
/// around the shared Nyquist bin: when shrinking, the symmetric bin pair
/// folds into the new Nyquist bin; when growing, the old Nyquist bin splits
/// across both spectrum halves. Equal lengths return an exact copy without
/// touching the spectrum.
pub fn resample(signal: &[f32], target_len: usize) -> EcgResult<Vec<f32>> {
    ensure_non_empty(signal, "resample")?;
    if target_len == 0 {
        return Err(EcgError::config("resample target length must be positive"));
    }

    let n = signal.len();
    if n == target_len {
        return Ok(signal.to_vec());
    }

    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(n);
    let mut spectrum: Vec<Complex<f32>> = signal
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .collect();
    forward.process(&mut spectrum);

    let mut target = vec![Complex::new(0.0f32, 0.0); target_len];
    let common = n.min(target_len);
    let nyq = common / 2 + 1;

    target[..nyq].copy_from_slice(&spectrum[..nyq]);
    for k in 1..common - nyq + 1 {
        target[target_len - k] = spectrum[n - k];
    }

    if common % 2 == 0 {
        let m = common / 2;
        if target_len < n {
            // Fold the mirrored bin into the new Nyquist bin.
            target[m] += spectrum[n - m];
        } else {
            // Split the old Nyquist bin across both halves.
            target[m] *= 0.5;
            target[target_len - m] = target[m];
        }
    }

    let inverse = planner.plan_fft_inverse(target_len);
    inverse.process(&mut target);

    // The unnormalized inverse carries a factor target_len; combined with
    // the amplitude rescale target_len/n this leaves a plain 1/n.
    let scale = 1.0 / n as f32;
    Ok(target.iter().map(|c| c.re * scale).collect())
}
