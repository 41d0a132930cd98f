//! Feature Extraction Error Types

use signal_dsp::DspError;
use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// Input window too short for the kernel's minimum
    #[error("{feature}: need at least {required} samples, got {actual}")]
    TooFewSamples {
        feature: &'static str,
        required: usize,
        actual: usize,
    },

    /// Input matrix has no channels
    #[error("{feature}: input has no channels")]
    NoChannels { feature: &'static str },

    /// Frequency band boundaries are not strictly increasing
    #[error("Frequency bands must be strictly increasing, got {0:?}")]
    NonMonotonicBands(Vec<f64>),

    /// Parameter outside its valid range
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },

    /// Name not present in the registry
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Error from the underlying signal-processing utilities
    #[error(transparent)]
    Dsp(#[from] DspError),
}
