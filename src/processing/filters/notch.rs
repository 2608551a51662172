// src/processing/filters/notch.rs
//! IIR notch design for powerline interference.

use std::f32::consts::PI;

use super::{BiquadSection, FilterCascade};
use crate::error::{EcgError, EcgResult};

/// Design a second-order notch at `center_freq` Hz.
///
/// `quality` is center frequency over rejection bandwidth; higher values
/// carve a narrower notch. Coefficients follow the standard normalized
/// biquad with `alpha = sin(omega) / (2 quality)`.
pub fn notch(center_freq: f32, quality: f32, sample_rate: f32) -> EcgResult<FilterCascade> {
    if center_freq <= 0.0 || center_freq >= sample_rate / 2.0 {
        return Err(EcgError::config(format!(
            "notch frequency {center_freq} Hz outside (0, {}) Hz",
            sample_rate / 2.0
        )));
    }
    if quality <= 0.0 {
        return Err(EcgError::config("notch quality must be positive"));
    }

    let omega = 2.0 * PI * center_freq / sample_rate;
    let alpha = omega.sin() / (2.0 * quality);
    let cos_omega = omega.cos();
    let norm = 1.0 / (1.0 + alpha);

    let section = BiquadSection::new(
        norm,
        -2.0 * cos_omega * norm,
        norm,
        -2.0 * cos_omega * norm,
        (1.0 - alpha) * norm,
    );

    Ok(FilterCascade::new(vec![section], None))
}
