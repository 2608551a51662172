// src/utils/interpolation.rs
//! Interpolation primitives used by the warp-style augmentations.

use crate::error::{EcgError, EcgResult};

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| (start as f64 + step * i as f64) as f32)
                .collect()
        }
    }
}

/// Sample `signal` at fractional position `pos` by linear interpolation.
///
/// Positions are clamped into `[0, len-1]`, so the call never reads out of
/// bounds even for warped coordinates beyond the signal.
pub fn sample_linear(signal: &[f32], pos: f32) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let max_idx = (signal.len() - 1) as f32;
    let pos = pos.clamp(0.0, max_idx);
    let lo = pos.floor() as usize;
    if lo >= signal.len() - 1 {
        return signal[signal.len() - 1];
    }
    let frac = pos - lo as f32;
    signal[lo] + (signal[lo + 1] - signal[lo]) * frac
}

/// Natural cubic spline through a set of strictly increasing knots.
///
/// Second derivatives at the end knots are zero (free boundary), which keeps
/// the interpolant defined for as few as three knots. Evaluation outside the
/// knot range continues the boundary segment polynomial.
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second_derivs: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `(xs[i], ys[i])`. Requires at least two knots
    /// with strictly increasing positions.
    pub fn new(xs: &[f32], ys: &[f32]) -> EcgResult<Self> {
        if xs.len() != ys.len() {
            return Err(EcgError::processing(
                "spline: knot positions and values differ in length",
            ));
        }
        if xs.len() < 2 {
            return Err(EcgError::processing("spline: need at least two knots"));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(EcgError::processing(
                "spline: knot positions must be strictly increasing",
            ));
        }

        let xs: Vec<f64> = xs.iter().map(|&x| x as f64).collect();
        let ys: Vec<f64> = ys.iter().map(|&y| y as f64).collect();
        let second_derivs = Self::solve_second_derivatives(&xs, &ys);

        Ok(Self {
            xs,
            ys,
            second_derivs,
        })
    }

    /// Tridiagonal (Thomas) solve for the interior second derivatives.
    fn solve_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
        let m = xs.len();
        let mut derivs = vec![0.0f64; m];
        if m < 3 {
            // Two knots degenerate to a straight line.
            return derivs;
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        // Forward sweep over the m-2 interior equations.
        let mut diag = vec![0.0f64; m];
        let mut rhs = vec![0.0f64; m];
        for i in 1..m - 1 {
            let slope_right = (ys[i + 1] - ys[i]) / h[i];
            let slope_left = (ys[i] - ys[i - 1]) / h[i - 1];
            diag[i] = 2.0 * (h[i - 1] + h[i]);
            rhs[i] = 6.0 * (slope_right - slope_left);
        }
        for i in 2..m - 1 {
            let factor = h[i - 1] / diag[i - 1];
            diag[i] -= factor * h[i - 1];
            rhs[i] -= factor * rhs[i - 1];
        }

        // Back substitution; natural boundary keeps derivs[0] and
        // derivs[m-1] at zero.
        derivs[m - 2] = rhs[m - 2] / diag[m - 2];
        for i in (1..m - 2).rev() {
            derivs[i] = (rhs[i] - h[i] * derivs[i + 1]) / diag[i];
        }
        derivs
    }

    /// Evaluate the spline at `t`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t as f64;
        let m = self.xs.len();

        // Locate the segment; out-of-range values use the boundary segment.
        let mut seg = match self
            .xs
            .binary_search_by(|x| x.partial_cmp(&t).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        if seg >= m - 1 {
            seg = m - 2;
        }

        let h = self.xs[seg + 1] - self.xs[seg];
        let a = (self.xs[seg + 1] - t) / h;
        let b = (t - self.xs[seg]) / h;
        let value = a * self.ys[seg]
            + b * self.ys[seg + 1]
            + ((a.powi(3) - a) * self.second_derivs[seg]
                + (b.powi(3) - b) * self.second_derivs[seg + 1])
                * h * h
                / 6.0;
        value as f32
    }
}
