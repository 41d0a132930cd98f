//! Zero-Phase Band-Pass Filtering

use crate::error::DspError;
use ndarray::{Array2, ArrayView2};
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::trace;

/// Zero-phase band-pass filter applied to each channel.
///
/// Implemented by masking the FFT of the signal: bins whose frequency
/// magnitude falls outside `[low, high]` are zeroed before the inverse
/// transform. A frequency-domain mask has no phase response, so the
/// output is delay-free by construction.
pub fn filt(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    band: (f64, f64),
) -> Result<Array2<f64>, DspError> {
    if sfreq <= 0.0 {
        return Err(DspError::NonPositiveParameter {
            name: "sfreq",
            value: sfreq,
        });
    }
    let (low, high) = band;
    let nyquist = sfreq / 2.0;
    if !(0.0 <= low && low < high && high <= nyquist) {
        return Err(DspError::InvalidBand { low, high, sfreq });
    }
    let (n_channels, n_times) = data.dim();
    if n_times < 2 {
        return Err(DspError::TooFewSamples {
            required: 2,
            actual: n_times,
        });
    }

    trace!(low, high, n_channels, n_times, "band-pass filtering");
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_times);
    let ifft = planner.plan_fft_inverse(n_times);

    let freq_resolution = sfreq / n_times as f64;
    let mut out = Array2::<f64>::zeros((n_channels, n_times));
    let mut buffer = vec![Complex::new(0.0, 0.0); n_times];
    for (ch, row) in data.outer_iter().enumerate() {
        for (dst, &src) in buffer.iter_mut().zip(row.iter()) {
            *dst = Complex::new(src, 0.0);
        }
        fft.process(&mut buffer);

        for (k, bin) in buffer.iter_mut().enumerate() {
            // Two-sided spectrum: bins above n/2 alias to negative frequencies.
            let freq = if k <= n_times / 2 {
                k as f64 * freq_resolution
            } else {
                (n_times - k) as f64 * freq_resolution
            };
            if freq < low || freq > high {
                *bin = Complex::new(0.0, 0.0);
            }
        }

        ifft.process(&mut buffer);
        let scale = 1.0 / n_times as f64;
        for (t, bin) in buffer.iter().enumerate() {
            out[[ch, t]] = bin.re * scale;
        }
    }
    Ok(out)
}
