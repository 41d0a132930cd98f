//! Discrete Wavelet Decomposition
//!
//! Multi-level forward DWT (analysis filter bank) with symmetric edge
//! extension, for energy-per-level style features.

use crate::error::DspError;
use std::str::FromStr;

/// Wavelet family selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wavelet {
    /// Haar wavelet (db1). Taps: [1/√2, 1/√2].
    Haar,
    /// Daubechies wavelet with 2 vanishing moments (4 taps).
    Db2,
    /// Daubechies wavelet with 4 vanishing moments (8 taps).
    Db4,
    /// Symlet-4. Near-symmetric 8-tap variant of Daubechies.
    Sym4,
}

impl FromStr for Wavelet {
    type Err = DspError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "haar" | "db1" => Ok(Wavelet::Haar),
            "db2" => Ok(Wavelet::Db2),
            "db4" => Ok(Wavelet::Db4),
            "sym4" => Ok(Wavelet::Sym4),
            other => Err(DspError::UnknownWavelet(other.to_string())),
        }
    }
}

/// Analysis filter pair for a wavelet.
#[derive(Debug, Clone)]
pub struct WaveletFilter {
    /// Lowpass decomposition filter
    pub lo_d: Vec<f64>,
    /// Highpass decomposition filter
    pub hi_d: Vec<f64>,
}

impl WaveletFilter {
    /// Build the analysis filter bank for `wavelet`.
    ///
    /// The highpass filter follows from the lowpass one via the QMF
    /// relation `hi_d[m] = (-1)^(N-1-m) * lo_d[N-1-m]`.
    pub fn new(wavelet: Wavelet) -> Self {
        let lo_d: Vec<f64> = match wavelet {
            Wavelet::Haar => {
                let v = std::f64::consts::FRAC_1_SQRT_2;
                vec![v, v]
            }
            Wavelet::Db2 => {
                let s = 4.0 * 2.0_f64.sqrt();
                vec![
                    (1.0 + 3.0_f64.sqrt()) / s,
                    (3.0 + 3.0_f64.sqrt()) / s,
                    (3.0 - 3.0_f64.sqrt()) / s,
                    (1.0 - 3.0_f64.sqrt()) / s,
                ]
            }
            Wavelet::Db4 => vec![
                0.230_377_813_308_855_23,
                0.714_846_570_552_541_5,
                0.630_880_767_929_590_4,
                -0.027_983_769_416_983_85,
                -0.187_034_811_718_881_14,
                0.030_841_381_835_986_965,
                0.032_883_011_666_982_945,
                -0.010_597_401_784_997_278,
            ],
            Wavelet::Sym4 => vec![
                -0.075_765_714_789_273_33,
                -0.029_635_527_645_998_51,
                0.497_618_667_632_015_45,
                0.803_738_751_805_916_1,
                0.297_857_795_605_277_36,
                -0.099_219_543_576_847_22,
                -0.012_603_967_262_037_833,
                0.032_223_100_604_042_702,
            ],
        };

        let n = lo_d.len();
        let hi_d: Vec<f64> = (0..n)
            .map(|m| {
                let sign = if (n - 1 - m) % 2 == 0 { 1.0 } else { -1.0 };
                sign * lo_d[n - 1 - m]
            })
            .collect();

        Self { lo_d, hi_d }
    }

    /// Filter length in taps.
    pub fn len(&self) -> usize {
        self.lo_d.len()
    }

    /// True only for an empty filter (never constructed here).
    pub fn is_empty(&self) -> bool {
        self.lo_d.is_empty()
    }
}

/// Multi-level DWT coefficients.
#[derive(Debug, Clone)]
pub struct WaveletDecomposition {
    /// Approximation coefficients at the coarsest level
    pub approximation: Vec<f64>,
    /// Detail coefficients at each level, finest first
    pub details: Vec<Vec<f64>>,
}

impl WaveletDecomposition {
    /// Number of decomposition levels.
    pub fn num_levels(&self) -> usize {
        self.details.len()
    }
}

/// Maximum useful decomposition level for a signal of `n` samples.
///
/// One more level would leave fewer coefficients than the filter has taps.
pub fn dwt_max_level(n: usize, wavelet: Wavelet) -> usize {
    let filt_len = WaveletFilter::new(wavelet).len();
    if n < filt_len {
        return 0;
    }
    (n as f64 / (filt_len - 1) as f64).log2().floor() as usize
}

/// Multi-level DWT decomposition of a single channel.
pub fn wavedec(
    signal: &[f64],
    wavelet: Wavelet,
    level: usize,
) -> Result<WaveletDecomposition, DspError> {
    if level == 0 {
        return Err(DspError::NonPositiveParameter {
            name: "level",
            value: 0.0,
        });
    }
    let filter = WaveletFilter::new(wavelet);
    if signal.len() < filter.len() {
        return Err(DspError::TooFewSamples {
            required: filter.len(),
            actual: signal.len(),
        });
    }

    let mut approx = signal.to_vec();
    let mut details = Vec::with_capacity(level);
    for _ in 0..level {
        let (a, d) = decompose_level(&approx, &filter);
        details.push(d);
        approx = a;
    }

    Ok(WaveletDecomposition {
        approximation: approx,
        details,
    })
}

/// Single-level decomposition: filter + downsample by 2.
fn decompose_level(input: &[f64], filter: &WaveletFilter) -> (Vec<f64>, Vec<f64>) {
    let n = input.len();
    let out_len = (n + 1) / 2;

    let mut approx = Vec::with_capacity(out_len);
    let mut detail = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let mut lo_sum = 0.0;
        let mut hi_sum = 0.0;
        for (k, (&lo, &hi)) in filter.lo_d.iter().zip(filter.hi_d.iter()).enumerate() {
            let idx = 2 * i + k;
            // Symmetric extension past the right edge
            let sample = if idx < n {
                input[idx]
            } else {
                input[n.saturating_sub(1).saturating_sub(idx - n)]
            };
            lo_sum += lo * sample;
            hi_sum += hi * sample;
        }
        approx.push(lo_sum);
        detail.push(hi_sum);
    }
    (approx, detail)
}
