// src/utils/stats.rs
//! Descriptive statistics shared by normalization, denoising and quality
//! assessment.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f32>() / data.len() as f32
}

/// Population variance (normalized by N, not N-1).
pub fn variance(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m).powi(2)).sum::<f32>() / data.len() as f32
}

/// Population standard deviation.
pub fn std_dev(data: &[f32]) -> f32 {
    variance(data).sqrt()
}

/// Largest absolute sample value. Returns 0.0 for an empty slice.
pub fn max_abs(data: &[f32]) -> f32 {
    data.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Smallest sample value.
pub fn min_value(data: &[f32]) -> f32 {
    data.iter().fold(f32::INFINITY, |acc, &x| acc.min(x))
}

/// Largest sample value.
pub fn max_value(data: &[f32]) -> f32 {
    data.iter().fold(f32::NEG_INFINITY, |acc, &x| acc.max(x))
}

/// Median of the samples. Averages the two central values for even lengths.
pub fn median(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in percent (0..=100). The fractional rank is `q/100 * (n-1)`,
/// matching the numpy default method.
pub fn percentile(data: &[f32], q: f32) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 100.0);
    let pos = q / 100.0 * (sorted.len() - 1) as f32;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f32;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Interquartile range (P75 - P25).
pub fn iqr(data: &[f32]) -> f32 {
    percentile(data, 75.0) - percentile(data, 25.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((mean(&data) - 2.5).abs() < 1e-6);
        assert!((variance(&data) - 1.25).abs() < 1e-6);
        assert!((std_dev(&data) - 1.25f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_empty_slices_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(max_abs(&[]), 0.0);
    }

    #[test]
    fn test_median_odd_even() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-6);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&data, 0.0) - 1.0).abs() < 1e-6);
        assert!((percentile(&data, 100.0) - 4.0).abs() < 1e-6);
        // rank 0.25 * 3 = 0.75 -> 1.0 + 0.75
        assert!((percentile(&data, 25.0) - 1.75).abs() < 1e-6);
        assert!((iqr(&data) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_max_abs_handles_negatives() {
        assert!((max_abs(&[-3.0, 2.0, 1.0]) - 3.0).abs() < 1e-6);
        assert!((min_value(&[-3.0, 2.0]) + 3.0).abs() < 1e-6);
        assert!((max_value(&[-3.0, 2.0]) - 2.0).abs() < 1e-6);
    }
}
