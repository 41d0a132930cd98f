//! Signal Processing Utilities
//!
//! Numeric building blocks consumed by the feature engine: one-sided
//! power spectrum estimation, time-delay embedding, zero-phase band-pass
//! filtering, and discrete wavelet decomposition.

mod embedding;
mod error;
mod filter;
mod spectrum;
pub mod wavelet;

pub use embedding::embed;
pub use error::DspError;
pub use filter::filt;
pub use spectrum::power_spectrum;
pub use wavelet::{dwt_max_level, wavedec, Wavelet, WaveletDecomposition, WaveletFilter};
