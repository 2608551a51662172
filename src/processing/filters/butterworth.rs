// src/processing/filters/butterworth.rs
//! Butterworth designs of arbitrary order as section cascades.

use std::f32::consts::PI;

use super::{BiquadSection, FilterCascade, FirstOrderSection};
use crate::error::{EcgError, EcgResult};

/// Band selection for a Butterworth edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandType {
    /// Pass frequencies below the cutoff.
    Lowpass,
    /// Pass frequencies above the cutoff.
    Highpass,
}

/// Design an order-`order` Butterworth filter at `cutoff` Hz.
///
/// The analog prototype poles give one Q value per conjugate pair,
/// `Q_j = 1 / (2 sin(pi (2j + 1) / (2 order)))`; each pair maps to one
/// biquad through the bilinear transform with pre-warped
/// `k = tan(pi cutoff / sample_rate)`. Odd orders add a single real pole as
/// a first-order section.
pub fn butterworth(
    order: usize,
    cutoff: f32,
    sample_rate: f32,
    band: BandType,
) -> EcgResult<FilterCascade> {
    if order == 0 {
        return Err(EcgError::config("filter order must be positive"));
    }
    if cutoff <= 0.0 || cutoff >= sample_rate / 2.0 {
        return Err(EcgError::config(format!(
            "cutoff {cutoff} Hz outside (0, {}) Hz",
            sample_rate / 2.0
        )));
    }

    let k = (PI * cutoff / sample_rate).tan();
    let pairs = order / 2;

    let mut biquads = Vec::with_capacity(pairs);
    for j in 0..pairs {
        let theta = PI * (2 * j + 1) as f32 / (2 * order) as f32;
        let q = 1.0 / (2.0 * theta.sin());
        biquads.push(biquad_section(k, q, band));
    }

    let first_order = (order % 2 == 1).then(|| first_order_section(k, band));

    Ok(FilterCascade::new(biquads, first_order))
}

/// Bandpass built as a highpass-at-`lowcut` and lowpass-at-`highcut`
/// cascade, each of `order`.
pub fn bandpass(
    order: usize,
    lowcut: f32,
    highcut: f32,
    sample_rate: f32,
) -> EcgResult<FilterCascade> {
    if lowcut <= 0.0 || highcut <= lowcut {
        return Err(EcgError::config(format!(
            "band edges must satisfy 0 < lowcut < highcut, got ({lowcut}, {highcut})"
        )));
    }
    let high = butterworth(order, lowcut, sample_rate, BandType::Highpass)?;
    let low = butterworth(order, highcut, sample_rate, BandType::Lowpass)?;
    Ok(high.chain(low))
}

fn biquad_section(k: f32, q: f32, band: BandType) -> BiquadSection {
    let k2 = k * k;
    let norm = 1.0 / (1.0 + k / q + k2);
    match band {
        BandType::Lowpass => BiquadSection::new(
            k2 * norm,
            2.0 * k2 * norm,
            k2 * norm,
            2.0 * (k2 - 1.0) * norm,
            (1.0 - k / q + k2) * norm,
        ),
        BandType::Highpass => BiquadSection::new(
            norm,
            -2.0 * norm,
            norm,
            2.0 * (k2 - 1.0) * norm,
            (1.0 - k / q + k2) * norm,
        ),
    }
}

fn first_order_section(k: f32, band: BandType) -> FirstOrderSection {
    let norm = 1.0 / (1.0 + k);
    match band {
        BandType::Lowpass => FirstOrderSection::new(k * norm, k * norm, (k - 1.0) * norm),
        BandType::Highpass => FirstOrderSection::new(norm, -norm, (k - 1.0) * norm),
    }
}
