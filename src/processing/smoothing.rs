// src/processing/smoothing.rs
//! Savitzky-Golay smoothing.

use crate::error::{ensure_non_empty, EcgResult};

/// Default smoothing window in samples.
pub const DEFAULT_WINDOW: usize = 51;
/// Default fitting polynomial order.
pub const DEFAULT_POLYORDER: usize = 3;

/// Smooth a signal by local least-squares polynomial fitting.
///
/// Even `window` values are incremented to the next odd value; windows wider
/// than the signal shrink to fit and `polyorder` is clamped below the
/// window. Edges use mirror extension. Degenerate windows (fewer than three
/// samples) return the input unchanged.
pub fn savitzky_golay(signal: &[f32], window: usize, polyorder: usize) -> EcgResult<Vec<f32>> {
    ensure_non_empty(signal, "savgol_smooth")?;
    let n = signal.len();

    let mut window = if window % 2 == 0 { window + 1 } else { window };
    if window > n {
        window = if n % 2 == 0 { n.saturating_sub(1) } else { n };
    }
    if window < 3 {
        return Ok(signal.to_vec());
    }
    let polyorder = polyorder.min(window - 1);

    let weights = center_weights(window, polyorder);
    let half = window as isize / 2;

    let out = (0..n as isize)
        .map(|t| {
            weights
                .iter()
                .enumerate()
                .map(|(w_idx, &w)| {
                    let offset = w_idx as isize - half;
                    w * signal[mirror_index(t + offset, n)] as f64
                })
                .sum::<f64>() as f32
        })
        .collect();
    Ok(out)
}

/// Mirror reflection about the end samples (no edge duplication).
fn mirror_index(idx: isize, len: usize) -> usize {
    let mut idx = idx;
    let last = (len - 1) as isize;
    // Window never exceeds the signal, so one reflection per side suffices.
    if idx < 0 {
        idx = -idx;
    }
    if idx > last {
        idx = 2 * last - idx;
    }
    idx as usize
}

/// Convolution weights that evaluate the least-squares polynomial fit at
/// the window center.
///
/// Solves the (polyorder+1)-dimensional normal equations `N y = e0` with
/// `N[a][b] = sum_i i^(a+b)` over symmetric offsets, then expands
/// `w_i = sum_a y[a] i^a`.
fn center_weights(window: usize, polyorder: usize) -> Vec<f64> {
    let half = window as isize / 2;
    let terms = polyorder + 1;

    let mut normal = vec![vec![0.0f64; terms]; terms];
    for i in -half..=half {
        let x = i as f64;
        let mut powers = vec![1.0f64; 2 * terms - 1];
        for p in 1..powers.len() {
            powers[p] = powers[p - 1] * x;
        }
        for (a, row) in normal.iter_mut().enumerate() {
            for (b, cell) in row.iter_mut().enumerate() {
                *cell += powers[a + b];
            }
        }
    }

    let mut rhs = vec![0.0f64; terms];
    rhs[0] = 1.0;
    let solution = solve_dense(&mut normal, &mut rhs);

    (-half..=half)
        .map(|i| {
            let x = i as f64;
            let mut acc = 0.0;
            let mut power = 1.0;
            for &coef in &solution {
                acc += coef * power;
                power *= x;
            }
            acc
        })
        .collect()
}

/// Gaussian elimination with partial pivoting on a small dense system.
fn solve_dense(matrix: &mut [Vec<f64>], rhs: &mut [f64]) -> Vec<f64> {
    let size = rhs.len();
    for col in 0..size {
        let pivot = (col..size)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .unwrap_or(col);
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);

        let diag = matrix[col][col];
        if diag.abs() < f64::EPSILON {
            continue;
        }
        for row in col + 1..size {
            let factor = matrix[row][col] / diag;
            for k in col..size {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0f64; size];
    for col in (0..size).rev() {
        let mut acc = rhs[col];
        for k in col + 1..size {
            acc -= matrix[col][k] * solution[k];
        }
        if matrix[col][col].abs() > f64::EPSILON {
            solution[col] = acc / matrix[col][col];
        }
    }
    solution
}
