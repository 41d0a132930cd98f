//! Feature Engine
//!
//! Per-channel univariate feature extraction from multichannel
//! time-series windows. A window is an `n_channels x n_times` view of
//! `f64` samples; every kernel maps it to a flat feature vector with a
//! fixed per-channel layout. The [`FeatureRegistry`] binds the kernels
//! to a sampling rate and a set of default parameters so callers can
//! select features by name.

mod correlation;
mod entropy;
mod error;
mod fractal;
mod hjorth;
mod regression;
mod registry;
mod spectral;
mod statistics;
mod wavelet;

pub use correlation::compute_decorr_time;
pub use entropy::{
    compute_app_entropy, compute_samp_entropy, compute_spect_entropy, compute_svd_entropy,
    compute_svd_fisher_info, DEFAULT_SVD_EMB, DEFAULT_SVD_TAU,
};
pub use error::FeatureError;
pub use fractal::{
    compute_higuchi_fd, compute_hurst_exponent, compute_katz_fd, DEFAULT_HIGUCHI_KMAX,
};
pub use hjorth::{
    compute_hjorth_complexity, compute_hjorth_mobility, compute_spect_hjorth_complexity,
    compute_spect_hjorth_mobility,
};
pub use registry::{FeatureFn, FeatureRegistry, RegistryConfig};
pub use spectral::{
    compute_energy_freq_bands, compute_pow_freq_bands, compute_spect_edge_freq, DEFAULT_EDGE,
    DEFAULT_FREQ_BANDS,
};
pub use statistics::{
    compute_kurtosis, compute_line_length, compute_mean, compute_ptp, compute_skewness,
    compute_std, compute_variance, compute_zero_crossings,
};
pub use wavelet::{compute_wavelet_coef_energy, DEFAULT_WAVELET};
