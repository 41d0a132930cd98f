//! Basic Per-Channel Statistics
//!
//! Time-axis reductions: moments, amplitude range, zero crossings, and
//! line length. Each returns one value per channel.

use crate::error::FeatureError;
use ndarray::{ArrayView1, ArrayView2};

/// Check the minimum window length shared by the kernels in this module.
fn check_len(
    feature: &'static str,
    data: &ArrayView2<'_, f64>,
    required: usize,
) -> Result<(), FeatureError> {
    if data.nrows() == 0 {
        return Err(FeatureError::NoChannels { feature });
    }
    let actual = data.ncols();
    if actual < required {
        return Err(FeatureError::TooFewSamples {
            feature,
            required,
            actual,
        });
    }
    Ok(())
}

fn mean_of(row: ArrayView1<'_, f64>) -> f64 {
    row.sum() / row.len() as f64
}

/// Mean of each channel.
pub fn compute_mean(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("mean", &data, 1)?;
    Ok(data.outer_iter().map(mean_of).collect())
}

/// Unbiased variance (divisor n - 1) of each channel.
pub fn compute_variance(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("variance", &data, 2)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            let m = mean_of(row.view());
            let ss: f64 = row.iter().map(|&x| (x - m) * (x - m)).sum();
            ss / (row.len() - 1) as f64
        })
        .collect())
}

/// Unbiased standard deviation of each channel.
pub fn compute_std(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    let mut out = compute_variance(data)?;
    for v in &mut out {
        *v = v.sqrt();
    }
    Ok(out)
}

/// Peak-to-peak amplitude of each channel.
pub fn compute_ptp(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("ptp_amplitude", &data, 1)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            let min = row.iter().cloned().fold(f64::MAX, f64::min);
            let max = row.iter().cloned().fold(f64::MIN, f64::max);
            max - min
        })
        .collect())
}

/// Skewness of each channel (population moments).
///
/// A zero-variance channel yields 0 rather than a division by zero.
pub fn compute_skewness(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("skewness", &data, 1)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            let (m2, m3, _) = central_moments(row.view());
            if m2 > 0.0 {
                m3 / m2.powf(1.5)
            } else {
                0.0
            }
        })
        .collect())
}

/// Kurtosis of each channel (population moments, non-Fisher convention).
///
/// A normal distribution scores 3. A zero-variance channel yields 0.
pub fn compute_kurtosis(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("kurtosis", &data, 1)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            let (m2, _, m4) = central_moments(row.view());
            if m2 > 0.0 {
                m4 / (m2 * m2)
            } else {
                0.0
            }
        })
        .collect())
}

/// Population central moments (m2, m3, m4) of one channel.
fn central_moments(row: ArrayView1<'_, f64>) -> (f64, f64, f64) {
    let n = row.len() as f64;
    let mean = mean_of(row.view());
    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &v in row.iter() {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Number of zero crossings of each channel.
///
/// A crossing is a strict sign flip between nonzero samples; samples
/// sitting exactly at zero carry the last nonzero sign forward, so a
/// signal leaving zero does not count a crossing.
pub fn compute_zero_crossings(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("zero_cross", &data, 1)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            let mut crossings = 0usize;
            let mut last_sign = 0i8;
            for &v in row.iter() {
                let sign = if v > 0.0 {
                    1
                } else if v < 0.0 {
                    -1
                } else {
                    0
                };
                if sign != 0 {
                    if last_sign != 0 && sign != last_sign {
                        crossings += 1;
                    }
                    last_sign = sign;
                }
            }
            crossings as f64
        })
        .collect())
}

/// Line length (sum of absolute first differences) of each channel.
pub fn compute_line_length(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_len("line_len", &data, 1)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            row.windows(2)
                .into_iter()
                .map(|w| (w[1] - w[0]).abs())
                .sum()
        })
        .collect())
}
