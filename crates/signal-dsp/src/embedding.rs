//! Time-Delay (Takens) Embedding

use crate::error::DspError;
use ndarray::{Array2, ArrayView1};

/// Delay-coordinate embedding of a single channel.
///
/// Row `i` of the result is `[x[i], x[i + delay], ..., x[i + (dim-1)*delay]]`,
/// giving `n - (dim - 1) * delay` rows of `dim` columns.
pub fn embed(
    channel: ArrayView1<'_, f64>,
    dim: usize,
    delay: usize,
) -> Result<Array2<f64>, DspError> {
    if dim == 0 {
        return Err(DspError::NonPositiveParameter {
            name: "dim",
            value: 0.0,
        });
    }
    if delay == 0 {
        return Err(DspError::NonPositiveParameter {
            name: "delay",
            value: 0.0,
        });
    }
    let n = channel.len();
    let span = (dim - 1) * delay;
    if n <= span {
        return Err(DspError::TooFewSamples {
            required: span + 1,
            actual: n,
        });
    }

    let n_rows = n - span;
    let mut out = Array2::<f64>::zeros((n_rows, dim));
    for i in 0..n_rows {
        for j in 0..dim {
            out[[i, j]] = channel[i + j * delay];
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_embedding_shape_and_content() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let m = embed(x.view(), 3, 2).unwrap();
        assert_eq!(m.dim(), (2, 3));
        assert_eq!(m.row(0).to_vec(), vec![0.0, 2.0, 4.0]);
        assert_eq!(m.row(1).to_vec(), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_rejects_short_input() {
        let x = array![0.0, 1.0, 2.0];
        assert!(embed(x.view(), 10, 2).is_err());
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        assert!(embed(x.view(), 0, 1).is_err());
        assert!(embed(x.view(), 2, 0).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_row_count_matches_span(
            n in 1usize..128,
            dim in 1usize..8,
            delay in 1usize..8,
        ) {
            let x = ndarray::Array1::from_iter((0..n).map(|i| i as f64));
            let span = (dim - 1) * delay;
            match embed(x.view(), dim, delay) {
                Ok(m) => {
                    proptest::prop_assert!(n > span);
                    proptest::prop_assert_eq!(m.dim(), (n - span, dim));
                }
                Err(_) => proptest::prop_assert!(n <= span),
            }
        }
    }
}
