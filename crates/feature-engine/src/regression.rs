//! Least-Squares Slope Helper

/// Ordinary least-squares slope between two equal-length sequences.
///
/// Closed form `(n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)` with f64
/// accumulation. Callers feeding log-transformed data are expected to
/// have kept the inputs finite beforehand.
pub(crate) fn slope_lstsq(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sx2 = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sx += xi;
        sy += yi;
        sx2 += xi * xi;
        sxy += xi * yi;
    }
    let num = n * sxy - sx * sy;
    let den = n * sx2 - sx * sx;
    num / den
}
