//! Wavelet Coefficient Energy

use crate::error::FeatureError;
use ndarray::ArrayView2;
use signal_dsp::{dwt_max_level, wavedec, Wavelet};

/// Decomposition depth cap for the wavelet energy feature
const MAX_LEVEL: usize = 6;

/// Default wavelet for the energy decomposition
pub const DEFAULT_WAVELET: Wavelet = Wavelet::Db4;

/// Energy of the detail coefficients at each DWT level, per channel.
///
/// The decomposition depth is the wavelet's maximum useful level capped
/// at 6. Each channel contributes one energy per level, walking the
/// detail bands from the finest scale to the coarsest, so the output
/// holds `n_channels * levels` values (channel-major).
pub fn compute_wavelet_coef_energy(
    data: ArrayView2<'_, f64>,
    wavelet: Wavelet,
) -> Result<Vec<f64>, FeatureError> {
    if data.nrows() == 0 {
        return Err(FeatureError::NoChannels {
            feature: "wavelet_coef_energy",
        });
    }
    let n_times = data.ncols();
    let level = dwt_max_level(n_times, wavelet).min(MAX_LEVEL);
    if level == 0 {
        return Err(FeatureError::TooFewSamples {
            feature: "wavelet_coef_energy",
            required: 2 * signal_dsp::WaveletFilter::new(wavelet).len(),
            actual: n_times,
        });
    }

    let mut out = Vec::with_capacity(data.nrows() * level);
    for row in data.outer_iter() {
        let dec = wavedec(&row.to_vec(), wavelet, level)?;
        for detail in &dec.details {
            out.push(detail.iter().map(|&c| c * c).sum());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_output_length_is_channels_times_levels() {
        let data = Array2::<f64>::ones((3, 256));
        // db4 (8 taps) on 256 samples: min(floor(log2(256/7)), 6) = 5
        let out = compute_wavelet_coef_energy(data.view(), Wavelet::Db4).unwrap();
        assert_eq!(out.len(), 3 * 5);
    }

    #[test]
    fn test_haar_caps_at_six_levels() {
        let data = Array2::<f64>::ones((1, 1024));
        let out = compute_wavelet_coef_energy(data.view(), Wavelet::Haar).unwrap();
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_constant_signal_has_vanishing_detail_energy() {
        let data = Array2::from_elem((1, 256), 5.0);
        let out = compute_wavelet_coef_energy(data.view(), Wavelet::Db4).unwrap();
        assert!(out.iter().all(|&e| e < 1e-12), "{out:?}");
    }

    #[test]
    fn test_slow_oscillation_concentrates_in_coarse_levels() {
        // 6 cycles over 512 samples falls inside the coarsest detail band
        // of a 6-level decomposition.
        let data = Array2::from_shape_fn((1, 512), |(_, i)| {
            (2.0 * std::f64::consts::PI * 6.0 * i as f64 / 512.0).sin()
        });
        let out = compute_wavelet_coef_energy(data.view(), Wavelet::Db4).unwrap();
        // Finest-scale detail carries far less energy than the coarsest.
        let finest = out[0];
        let coarsest = out[out.len() - 1];
        assert!(coarsest > 10.0 * finest, "{out:?}");
    }

    #[test]
    fn test_rejects_window_shorter_than_filter() {
        let data = Array2::<f64>::zeros((1, 4));
        assert!(compute_wavelet_coef_energy(data.view(), Wavelet::Db4).is_err());
    }
}
