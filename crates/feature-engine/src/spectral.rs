//! Band Power, Band Energy, and Spectral Edge Frequency

use crate::error::FeatureError;
use ndarray::{Array2, ArrayView2};
use signal_dsp::{filt, power_spectrum};

/// Canonical EEG band boundaries (delta/theta/alpha/beta/gamma), Hz
pub const DEFAULT_FREQ_BANDS: [f64; 6] = [0.5, 4.0, 8.0, 13.0, 30.0, 100.0];

/// Default spectral edge percentile (percent)
pub const DEFAULT_EDGE: f64 = 50.0;

fn check_bands(freq_bands: &[f64]) -> Result<(), FeatureError> {
    if freq_bands.len() < 2 || freq_bands.windows(2).any(|w| w[0] >= w[1]) {
        return Err(FeatureError::NonMonotonicBands(freq_bands.to_vec()));
    }
    Ok(())
}

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

/// Band index of a frequency: number of boundaries at or below it.
/// Index `j` in `1..n_bands` means the half-open band
/// `[freq_bands[j-1], freq_bands[j])`; 0 and `n_bands` fall outside.
fn digitize(freq: f64, freq_bands: &[f64]) -> usize {
    freq_bands.iter().take_while(|&&b| b <= freq).count()
}

/// Power per frequency band for each channel.
///
/// Output is channel-major, band-minor:
/// `out[c * (n_bands - 1) + b]`. With `normalize`, each channel's band
/// powers are divided by that channel's total spectral power, so bands
/// covering the whole spectrum sum to 1. A band containing no spectral
/// bin contributes 0.
pub fn compute_pow_freq_bands(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    freq_bands: &[f64],
    normalize: bool,
) -> Result<Vec<f64>, FeatureError> {
    check_input("pow_freq_bands", &data)?;
    check_bands(freq_bands)?;
    let (ps, freqs) = power_spectrum(sfreq, data, false)?;

    let n_bands = freq_bands.len() - 1;
    let bin_band: Vec<usize> = freqs.iter().map(|&f| digitize(f, freq_bands)).collect();

    let mut out = Vec::with_capacity(data.nrows() * n_bands);
    for row in ps.outer_iter() {
        let total: f64 = row.sum();
        for band in 1..=n_bands {
            let mut power: f64 = row
                .iter()
                .zip(bin_band.iter())
                .filter(|(_, &idx)| idx == band)
                .map(|(&p, _)| p)
                .sum();
            if normalize {
                power = if total > 0.0 { power / total } else { 0.0 };
            }
            out.push(power);
        }
    }
    Ok(out)
}

/// Signal energy per frequency band for each channel, the time-domain
/// analogue of band power: each band is band-pass filtered and the sum
/// of squared samples taken. With `deriv_filt`, a 3-tap discrete
/// derivative `[1, 0, -1]` (edge-replicated) is applied first.
pub fn compute_energy_freq_bands(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    freq_bands: &[f64],
    deriv_filt: bool,
) -> Result<Vec<f64>, FeatureError> {
    check_input("energy_freq_bands", &data)?;
    check_bands(freq_bands)?;

    let filtered_input: Array2<f64>;
    let input = if deriv_filt {
        filtered_input = derivative_filter(data);
        filtered_input.view()
    } else {
        data.view()
    };

    let n_channels = data.nrows();
    let n_bands = freq_bands.len() - 1;
    let mut out = vec![0.0; n_channels * n_bands];
    for band in 0..n_bands {
        let filtered = filt(sfreq, input, (freq_bands[band], freq_bands[band + 1]))?;
        for (ch, row) in filtered.outer_iter().enumerate() {
            out[ch * n_bands + band] = row.iter().map(|&v| v * v).sum();
        }
    }
    Ok(out)
}

/// Central-difference derivative with replicated edges.
fn derivative_filter(data: ArrayView2<'_, f64>) -> Array2<f64> {
    let (n_channels, n_times) = data.dim();
    Array2::from_shape_fn((n_channels, n_times), |(c, t)| {
        let next = data[[c, (t + 1).min(n_times - 1)]];
        let prev = data[[c, t.saturating_sub(1)]];
        next - prev
    })
}

/// Spectral edge frequency for each channel and edge percentile.
///
/// For each percentile, the lowest frequency at which the cumulative
/// spectrum reaches that share of the power below `ref_freq` (Nyquist
/// when `None`). Unreachable percentiles report the sentinel -1.0.
/// Output is channel-major, percentile-minor.
pub fn compute_spect_edge_freq(
    sfreq: f64,
    data: ArrayView2<'_, f64>,
    ref_freq: Option<f64>,
    edge: Option<&[f64]>,
) -> Result<Vec<f64>, FeatureError> {
    check_input("spect_edge_freq", &data)?;
    let ref_freq = ref_freq.unwrap_or(sfreq / 2.0);
    if ref_freq <= 0.0 || ref_freq > sfreq / 2.0 {
        return Err(FeatureError::NonPositiveParameter {
            name: "ref_freq",
            value: ref_freq,
        });
    }
    let default_edge = [DEFAULT_EDGE];
    let edge = edge.unwrap_or(&default_edge);
    for &e in edge {
        if e <= 0.0 {
            return Err(FeatureError::NonPositiveParameter {
                name: "edge",
                value: e,
            });
        }
    }
    let fractions: Vec<f64> = edge.iter().map(|&e| e / 100.0).collect();

    let (ps, freqs) = power_spectrum(sfreq, data, false)?;
    // Reference bin: first frequency at or above ref_freq, clamped to
    // the last bin (an odd-length window has no exact Nyquist bin).
    let idx_ref = freqs
        .iter()
        .position(|&f| f >= ref_freq)
        .unwrap_or(freqs.len() - 1);

    let mut out = Vec::with_capacity(data.nrows() * fractions.len());
    for row in ps.outer_iter() {
        let ref_pow: f64 = row.iter().take(idx_ref + 1).sum();
        let cumulative: Vec<f64> = row
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        for &fraction in &fractions {
            let target = fraction * ref_pow;
            match cumulative.iter().position(|&c| c >= target) {
                Some(idx) => out.push(freqs[idx]),
                None => out.push(-1.0),
            }
        }
    }
    Ok(out)
}
