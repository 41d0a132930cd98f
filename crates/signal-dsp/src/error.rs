//! DSP Error Types

use thiserror::Error;

/// Errors during signal processing
#[derive(Debug, Clone, Error)]
pub enum DspError {
    /// Parameter outside its valid range
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    /// Band edges are inverted or out of range
    #[error("Invalid frequency band [{low}, {high}] at sampling rate {sfreq}")]
    InvalidBand { low: f64, high: f64, sfreq: f64 },

    /// Wavelet name not recognized
    #[error("Unknown wavelet: {0}")]
    UnknownWavelet(String),

    /// Input too short for the requested operation
    #[error("Signal too short: need at least {required} samples, got {actual}")]
    TooFewSamples { required: usize, actual: usize },
}
