//! Hjorth Mobility and Complexity
//!
//! Time-domain variants follow the classic definition with the first
//! difference zero-padded at the start; spectral variants are the
//! frequency-weighted power moments.

use crate::error::FeatureError;
use ndarray::ArrayView2;
use signal_dsp::power_spectrum;

const EPS: f64 = 1e-12;

fn check_input(feature: &'static str, data: &ArrayView2<'_, f64>) -> Result<(), FeatureError> {
    if data.nrows() == 0 {
        return Err(FeatureError::NoChannels { feature });
    }
    if data.ncols() < 2 {
        return Err(FeatureError::TooFewSamples {
            feature,
            required: 2,
            actual: data.ncols(),
        });
    }
    Ok(())
}

fn unbiased_std(x: &[f64]) -> f64 {
    let n = x.len();
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|&v| (v - mean) * (v - mean)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Mobility of one channel: std of the zero-padded first difference
/// over the std of the (zero-padded) signal, both unbiased.
fn mobility_of(signal: &[f64]) -> f64 {
    let mut padded = Vec::with_capacity(signal.len() + 1);
    padded.push(0.0);
    padded.extend_from_slice(signal);
    let dx: Vec<f64> = padded.windows(2).map(|w| w[1] - w[0]).collect();
    unbiased_std(&dx) / unbiased_std(&padded).max(EPS)
}

/// Hjorth mobility of each channel (time domain).
pub fn compute_hjorth_mobility(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_input("hjorth_mobility", &data)?;
    Ok(data.outer_iter().map(|row| mobility_of(&row.to_vec())).collect())
}

/// Hjorth complexity of each channel (time domain): mobility of the
/// first difference over mobility of the signal.
pub fn compute_hjorth_complexity(data: ArrayView2<'_, f64>) -> Result<Vec<f64>, FeatureError> {
    check_input("hjorth_complexity", &data)?;
    Ok(data
        .outer_iter()
        .map(|row| {
            let signal = row.to_vec();
            let mut padded = Vec::with_capacity(signal.len() + 1);
            padded.push(0.0);
            padded.extend_from_slice(&signal);
            let dx: Vec<f64> = padded.windows(2).map(|w| w[1] - w[0]).collect();
            mobility_of(&dx) / mobility_of(&signal).max(EPS)
        })
        .collect())
}

fn spectral_moment(
    feature: &'static str,
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    exponent: i32,
    normalize: bool,
) -> Result<Vec<f64>, FeatureError> {
    check_input(feature, &data)?;
    let (ps, freqs) = power_spectrum(sfreq, data, false)?;
    Ok(ps
        .outer_iter()
        .map(|row| {
            let moment: f64 = row
                .iter()
                .zip(freqs.iter())
                .map(|(&p, &f)| p * f.powi(exponent))
                .sum();
            if normalize {
                let total: f64 = row.sum();
                if total <= 0.0 {
                    0.0
                } else {
                    moment / total
                }
            } else {
                moment
            }
        })
        .collect())
}

/// Hjorth mobility of each channel, computed from the power spectrum:
/// Σ power·freq², optionally normalized by total power.
pub fn compute_spect_hjorth_mobility(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    normalize: bool,
) -> Result<Vec<f64>, FeatureError> {
    spectral_moment("hjorth_mobility_spect", sfreq, data, 2, normalize)
}

/// Hjorth complexity of each channel, computed from the power spectrum:
/// Σ power·freq⁴, optionally normalized by total power.
pub fn compute_spect_hjorth_complexity(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    normalize: bool,
) -> Result<Vec<f64>, FeatureError> {
    spectral_moment("hjorth_complexity_spect", sfreq, data, 4, normalize)
}
