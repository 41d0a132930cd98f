//! One-Sided Power Spectrum Estimation

use crate::error::DspError;
use ndarray::{Array2, ArrayView2};
use rustfft::{num_complex::Complex, FftPlanner};

/// Floor applied before taking logarithms of spectral power
const POWER_FLOOR: f64 = 1e-12;

/// One-sided power spectrum of each channel.
///
/// Returns `(power, freqs)` where `power` has shape
/// (n_channels, n/2 + 1) and `freqs` holds the ascending bin centers
/// `k * sfreq / n` up to the Nyquist frequency. Power is the squared
/// magnitude of the real-input DFT; with `return_db` it is converted to
/// decibels with a small floor so empty bins stay finite.
pub fn power_spectrum(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    return_db: bool,
) -> Result<(Array2<f64>, Vec<f64>), DspError> {
    if sfreq <= 0.0 {
        return Err(DspError::NonPositiveParameter {
            name: "sfreq",
            value: sfreq,
        });
    }
    let (n_channels, n_times) = data.dim();
    if n_times < 2 {
        return Err(DspError::TooFewSamples {
            required: 2,
            actual: n_times,
        });
    }

    let n_bins = n_times / 2 + 1;
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_times);

    let mut power = Array2::<f64>::zeros((n_channels, n_bins));
    let mut buffer = vec![Complex::new(0.0, 0.0); n_times];
    for (ch, row) in data.outer_iter().enumerate() {
        for (dst, &src) in buffer.iter_mut().zip(row.iter()) {
            *dst = Complex::new(src, 0.0);
        }
        fft.process(&mut buffer);
        for k in 0..n_bins {
            let p = buffer[k].norm_sqr();
            power[[ch, k]] = if return_db {
                10.0 * p.max(POWER_FLOOR).log10()
            } else {
                p
            };
        }
    }

    let freq_resolution = sfreq / n_times as f64;
    let freqs: Vec<f64> = (0..n_bins).map(|k| k as f64 * freq_resolution).collect();
    Ok((power, freqs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sine_matrix(freq: f64, sfreq: f64, n: usize) -> Array2<f64> {
        Array2::from_shape_fn((1, n), |(_, i)| {
            (2.0 * std::f64::consts::PI * freq * i as f64 / sfreq).sin()
        })
    }

    #[test]
    fn test_peak_at_sine_frequency() {
        let sfreq = 128.0;
        let data = sine_matrix(8.0, sfreq, 256);
        let (ps, freqs) = power_spectrum(sfreq, data.view(), false).unwrap();

        let peak = ps
            .row(0)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!((freqs[peak] - 8.0).abs() < 0.5);
    }

    #[test]
    fn test_bin_layout() {
        let data = Array2::<f64>::zeros((2, 100));
        let (ps, freqs) = power_spectrum(200.0, data.view(), false).unwrap();
        assert_eq!(ps.dim(), (2, 51));
        assert_eq!(freqs.len(), 51);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[50] - 100.0).abs() < 1e-9); // Nyquist
    }

    #[test]
    fn test_db_stays_finite_on_silence() {
        let data = Array2::<f64>::zeros((1, 64));
        let (ps, _) = power_spectrum(64.0, data.view(), true).unwrap();
        assert!(ps.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_rejects_bad_sfreq() {
        let data = Array2::<f64>::zeros((1, 64));
        assert!(power_spectrum(0.0, data.view(), false).is_err());
    }
}
