//! Feature Registry
//!
//! Name → kernel dispatch table. The registry is built once per
//! sampling rate; every entry closes over that rate and the configured
//! defaults, so a caller only supplies the signal window.

use crate::correlation::compute_decorr_time;
use crate::entropy::{
    compute_app_entropy, compute_samp_entropy, compute_spect_entropy, compute_svd_entropy,
    compute_svd_fisher_info, DEFAULT_SVD_EMB, DEFAULT_SVD_TAU,
};
use crate::error::FeatureError;
use crate::fractal::{
    compute_higuchi_fd, compute_hurst_exponent, compute_katz_fd, DEFAULT_HIGUCHI_KMAX,
};
use crate::hjorth::{
    compute_hjorth_complexity, compute_hjorth_mobility, compute_spect_hjorth_complexity,
    compute_spect_hjorth_mobility,
};
use crate::spectral::{
    compute_energy_freq_bands, compute_pow_freq_bands, compute_spect_edge_freq,
    DEFAULT_FREQ_BANDS,
};
use crate::statistics::{
    compute_kurtosis, compute_line_length, compute_mean, compute_ptp, compute_skewness,
    compute_std, compute_variance, compute_zero_crossings,
};
use crate::wavelet::compute_wavelet_coef_energy;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use signal_dsp::Wavelet;
use std::collections::BTreeMap;
use tracing::debug;

/// A registered kernel: signal window in, flat feature vector out.
pub type FeatureFn = Box<dyn Fn(ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> + Send + Sync>;

/// Default parameters bound into the registry entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Frequency band boundaries (Hz), strictly increasing
    pub freq_bands: Vec<f64>,
    /// Normalize band powers by each channel's total power
    pub normalize_band_power: bool,
    /// Apply the discrete derivative filter before band-energy filtering
    pub deriv_filt: bool,
    /// Normalize the spectral Hjorth moments by total power
    pub normalize_spect_hjorth: bool,
    /// Maximum delay for the Higuchi curve-length sweep
    pub higuchi_kmax: usize,
    /// Embedding delay (samples) for the SVD measures
    pub svd_tau: usize,
    /// Embedding dimension for the SVD measures
    pub svd_emb: usize,
    /// Wavelet name for the coefficient-energy feature
    pub wavelet: String,
    /// Spectral edge percentiles (percent)
    pub edge: Vec<f64>,
    /// Reference frequency for the spectral edge (Nyquist when None)
    pub ref_freq: Option<f64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            freq_bands: DEFAULT_FREQ_BANDS.to_vec(),
            normalize_band_power: true,
            deriv_filt: true,
            normalize_spect_hjorth: false,
            higuchi_kmax: DEFAULT_HIGUCHI_KMAX,
            svd_tau: DEFAULT_SVD_TAU,
            svd_emb: DEFAULT_SVD_EMB,
            wavelet: "db4".to_string(),
            edge: vec![crate::spectral::DEFAULT_EDGE],
            ref_freq: None,
        }
    }
}

impl RegistryConfig {
    fn validate(&self) -> Result<Wavelet, FeatureError> {
        if self.freq_bands.len() < 2 || self.freq_bands.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FeatureError::NonMonotonicBands(self.freq_bands.clone()));
        }
        if self.higuchi_kmax < 2 {
            return Err(FeatureError::NonPositiveParameter {
                name: "higuchi_kmax",
                value: self.higuchi_kmax as f64,
            });
        }
        if self.svd_tau == 0 {
            return Err(FeatureError::NonPositiveParameter {
                name: "svd_tau",
                value: 0.0,
            });
        }
        if self.svd_emb == 0 {
            return Err(FeatureError::NonPositiveParameter {
                name: "svd_emb",
                value: 0.0,
            });
        }
        for &e in &self.edge {
            if e <= 0.0 {
                return Err(FeatureError::NonPositiveParameter {
                    name: "edge",
                    value: e,
                });
            }
        }
        Ok(self.wavelet.parse::<Wavelet>()?)
    }
}

/// Immutable lookup table of univariate feature kernels for one
/// sampling rate.
pub struct FeatureRegistry {
    sfreq: f64,
    entries: BTreeMap<&'static str, FeatureFn>,
}

impl FeatureRegistry {
    /// Build the registry with default parameters.
    pub fn new(sfreq: f64) -> Result<Self, FeatureError> {
        Self::with_config(sfreq, RegistryConfig::default())
    }

    /// Build the registry with explicit parameters.
    pub fn with_config(sfreq: f64, config: RegistryConfig) -> Result<Self, FeatureError> {
        if sfreq <= 0.0 {
            return Err(FeatureError::NonPositiveParameter {
                name: "sfreq",
                value: sfreq,
            });
        }
        let wavelet = config.validate()?;

        let mut entries: BTreeMap<&'static str, FeatureFn> = BTreeMap::new();
        entries.insert("mean", Box::new(compute_mean));
        entries.insert("variance", Box::new(compute_variance));
        entries.insert("std", Box::new(compute_std));
        entries.insert("ptp_amplitude", Box::new(compute_ptp));
        entries.insert("skewness", Box::new(compute_skewness));
        entries.insert("kurtosis", Box::new(compute_kurtosis));
        entries.insert("zero_cross", Box::new(compute_zero_crossings));
        entries.insert("line_len", Box::new(compute_line_length));
        entries.insert("hurst_exp", Box::new(compute_hurst_exponent));
        entries.insert("katz_fd", Box::new(compute_katz_fd));
        entries.insert("app_entropy", Box::new(compute_app_entropy));
        entries.insert("samp_entropy", Box::new(compute_samp_entropy));
        entries.insert("hjorth_mobility", Box::new(compute_hjorth_mobility));
        entries.insert("hjorth_complexity", Box::new(compute_hjorth_complexity));

        entries.insert("decorr_time", Box::new(move |d| compute_decorr_time(sfreq, d)));
        entries.insert(
            "spect_entropy",
            Box::new(move |d| compute_spect_entropy(sfreq, d)),
        );

        let normalize = config.normalize_spect_hjorth;
        entries.insert(
            "hjorth_mobility_spect",
            Box::new(move |d| compute_spect_hjorth_mobility(sfreq, d, normalize)),
        );
        entries.insert(
            "hjorth_complexity_spect",
            Box::new(move |d| compute_spect_hjorth_complexity(sfreq, d, normalize)),
        );

        let kmax = config.higuchi_kmax;
        entries.insert(
            "higuchi_fd",
            Box::new(move |d| compute_higuchi_fd(d, kmax)),
        );

        let (tau, emb) = (config.svd_tau, config.svd_emb);
        entries.insert(
            "svd_entropy",
            Box::new(move |d| compute_svd_entropy(d, tau, emb)),
        );
        entries.insert(
            "svd_fisher_info",
            Box::new(move |d| compute_svd_fisher_info(d, tau, emb)),
        );

        let bands = config.freq_bands.clone();
        let normalize = config.normalize_band_power;
        entries.insert(
            "pow_freq_bands",
            Box::new(move |d| compute_pow_freq_bands(sfreq, d, &bands, normalize)),
        );

        let bands = config.freq_bands.clone();
        let deriv = config.deriv_filt;
        entries.insert(
            "energy_freq_bands",
            Box::new(move |d| compute_energy_freq_bands(sfreq, d, &bands, deriv)),
        );

        let (ref_freq, edge) = (config.ref_freq, config.edge.clone());
        entries.insert(
            "spect_edge_freq",
            Box::new(move |d| compute_spect_edge_freq(sfreq, d, ref_freq, Some(&edge))),
        );

        entries.insert(
            "wavelet_coef_energy",
            Box::new(move |d| compute_wavelet_coef_energy(d, wavelet)),
        );

        Ok(Self { sfreq, entries })
    }

    /// Sampling rate the registry was built for.
    pub fn sfreq(&self) -> f64 {
        self.sfreq
    }

    /// Number of registered features.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no features are registered (never after construction).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered feature names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Look up a kernel by name.
    pub fn get(&self, name: &str) -> Option<&FeatureFn> {
        self.entries.get(name)
    }

    /// Compute one feature for a signal window.
    pub fn compute(
        &self,
        name: &str,
        data: ArrayView2<'_, f64>,
    ) -> Result<Vec<f64>, FeatureError> {
        let kernel = self
            .entries
            .get(name)
            .ok_or_else(|| FeatureError::UnknownFeature(name.to_string()))?;
        let out = kernel(data)?;
        debug!(
            feature = name,
            n_channels = data.nrows(),
            n_times = data.ncols(),
            n_values = out.len(),
            "computed feature"
        );
        Ok(out)
    }

    /// Compute several features and concatenate them in request order.
    pub fn compute_all(
        &self,
        names: &[&str],
        data: ArrayView2<'_, f64>,
    ) -> Result<Vec<f64>, FeatureError> {
        let mut out = Vec::new();
        for name in names {
            out.extend(self.compute(name, data)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Channel 0 all zeros, channel 1 a unit-step ramp 0..=255.
    fn reference_window() -> Array2<f64> {
        Array2::from_shape_fn((2, 256), |(c, t)| if c == 0 { 0.0 } else { t as f64 })
    }

    #[test]
    fn test_reference_window_scenario() {
        let registry = FeatureRegistry::new(256.0).unwrap();
        let data = reference_window();

        assert_eq!(
            registry.compute("mean", data.view()).unwrap(),
            vec![0.0, 127.5]
        );
        assert_eq!(
            registry.compute("ptp_amplitude", data.view()).unwrap(),
            vec![0.0, 255.0]
        );
        assert_eq!(
            registry.compute("zero_cross", data.view()).unwrap(),
            vec![0.0, 0.0]
        );
        assert_eq!(
            registry.compute("line_len", data.view()).unwrap(),
            vec![0.0, 255.0]
        );
        // Unbiased variance of 0..=255 is n(n+1)/12 = 256 * 257 / 12
        let var = registry.compute("variance", data.view()).unwrap();
        assert_eq!(var[0], 0.0);
        assert!((var[1] - 256.0 * 257.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_registered_feature_runs() {
        let registry = FeatureRegistry::new(256.0).unwrap();
        let data = Array2::from_shape_fn((2, 256), |(c, t)| {
            let phase = 2.0 * std::f64::consts::PI * t as f64 / 256.0;
            (phase * (10.0 + c as f64)).sin() + 0.1 * (phase * 57.0).cos()
        });
        for name in registry.names().collect::<Vec<_>>() {
            let out = registry.compute(name, data.view()).unwrap();
            assert!(!out.is_empty(), "{name} returned nothing");
            assert!(
                out.iter().all(|v| v.is_finite()),
                "{name} produced non-finite values: {out:?}"
            );
        }
    }

    #[test]
    fn test_registry_holds_all_kernels() {
        let registry = FeatureRegistry::new(128.0).unwrap();
        assert_eq!(registry.len(), 25);
        for name in [
            "mean",
            "hurst_exp",
            "app_entropy",
            "samp_entropy",
            "higuchi_fd",
            "pow_freq_bands",
            "energy_freq_bands",
            "spect_edge_freq",
            "svd_fisher_info",
            "wavelet_coef_energy",
        ] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_unknown_feature_is_rejected() {
        let registry = FeatureRegistry::new(128.0).unwrap();
        let data = Array2::<f64>::zeros((1, 64));
        assert!(matches!(
            registry.compute("fft_magic", data.view()),
            Err(FeatureError::UnknownFeature(_))
        ));
    }

    #[test]
    fn test_compute_all_concatenates_in_request_order() {
        let registry = FeatureRegistry::new(256.0).unwrap();
        let data = reference_window();
        let out = registry
            .compute_all(&["ptp_amplitude", "mean"], data.view())
            .unwrap();
        assert_eq!(out, vec![0.0, 255.0, 0.0, 127.5]);
    }

    #[test]
    fn test_band_feature_lengths_follow_config() {
        let registry = FeatureRegistry::new(256.0).unwrap();
        let data = reference_window();
        let out = registry.compute("pow_freq_bands", data.view()).unwrap();
        assert_eq!(out.len(), 2 * 5);
    }

    #[test]
    fn test_invalid_construction_is_rejected() {
        assert!(FeatureRegistry::new(0.0).is_err());

        let bad_bands = RegistryConfig {
            freq_bands: vec![8.0, 4.0],
            ..Default::default()
        };
        assert!(FeatureRegistry::with_config(128.0, bad_bands).is_err());

        let bad_wavelet = RegistryConfig {
            wavelet: "morlet".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            FeatureRegistry::with_config(128.0, bad_wavelet),
            Err(FeatureError::Dsp(signal_dsp::DspError::UnknownWavelet(_)))
        ));
    }

    #[test]
    fn test_custom_edge_percentiles_widen_output() {
        let config = RegistryConfig {
            edge: vec![25.0, 50.0, 75.0],
            ..Default::default()
        };
        let registry = FeatureRegistry::with_config(256.0, config).unwrap();
        let data = Array2::from_shape_fn((2, 256), |(_, t)| {
            (2.0 * std::f64::consts::PI * 10.0 * t as f64 / 256.0).sin()
        });
        let out = registry.compute("spect_edge_freq", data.view()).unwrap();
        assert_eq!(out.len(), 2 * 3);
    }
}
