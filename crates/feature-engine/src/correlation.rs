//! Autocorrelation and Decorrelation Time

use crate::error::FeatureError;
use ndarray::{ArrayView1, ArrayView2};
use rustfft::{num_complex::Complex, FftPlanner};

/// Unbiased autocorrelation of one channel, non-negative lags only.
///
/// Computed via FFT (correlation theorem) and normalized per lag by the
/// number of unbiased overlap terms `n - 1 - lag`, clamped to 1 at the
/// extreme lags where that count reaches zero.
fn unbiased_autocorr(x: ArrayView1<'_, f64>) -> Vec<f64> {
    let n = x.len();
    let size = (2 * n).next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(size);
    let ifft = planner.plan_fft_inverse(size);

    let mut buffer = vec![Complex::new(0.0, 0.0); size];
    for (dst, &src) in buffer.iter_mut().zip(x.iter()) {
        *dst = Complex::new(src, 0.0);
    }
    fft.process(&mut buffer);
    for bin in buffer.iter_mut() {
        *bin = Complex::new(bin.norm_sqr(), 0.0);
    }
    ifft.process(&mut buffer);

    let scale = 1.0 / size as f64;
    (0..n)
        .map(|lag| {
            let count = (n as isize - 1 - lag as isize).max(1) as f64;
            buffer[lag].re * scale / count
        })
        .collect()
}

/// Decorrelation time of each channel, in seconds.
///
/// Index of the first non-positive autocorrelation lag divided by the
/// sampling rate; -1.0 when the autocorrelation never leaves the
/// positive half-plane.
pub fn compute_decorr_time(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
) -> Result<Vec<f64>, FeatureError> {
    if sfreq <= 0.0 {
        return Err(FeatureError::NonPositiveParameter {
            name: "sfreq",
            value: sfreq,
        });
    }
    if data.nrows() == 0 {
        return Err(FeatureError::NoChannels {
            feature: "decorr_time",
        });
    }
    if data.ncols() < 2 {
        return Err(FeatureError::TooFewSamples {
            feature: "decorr_time",
            required: 2,
            actual: data.ncols(),
        });
    }

    Ok(data
        .outer_iter()
        .map(|row| {
            let ac = unbiased_autocorr(row.view());
            match ac.iter().position(|&v| v <= 0.0) {
                Some(lag) => lag as f64 / sfreq,
                None => -1.0,
            }
        })
        .collect())
}
