//! Cosine similarity / self-similarity.

use ndarray::Array2;

use crate::error::Result;

fn l2_normalize_columns(x: &Array2<f64>) -> Array2<f64> {
    let mut out = x.clone();
    for mut col in out.columns_mut() {
        let norm = col.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            col.mapv_inplace(|v| v / norm);
        }
    }
    out
}

/// Cosine similarity between every column of `a` and every column of `b`
/// (both `[F, T]`), i.e. `normalize(a)^T * normalize(b)`. Result is `[T, T]`
/// in `[-1, 1]` (`[0, 1]` for non-negative inputs such as magnitude
/// spectrograms).
pub fn similarity(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let an = l2_normalize_columns(a);
    let bn = l2_normalize_columns(b);
    Ok(an.t().dot(&bn))
}

/// Self-similarity: `similarity(a, a)`. Symmetric with a unit diagonal for
/// any column with nonzero norm.
pub fn self_similarity(a: &Array2<f64>) -> Result<Array2<f64>> {
    similarity(a, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn self_similarity_is_symmetric_with_unit_diagonal() {
        let a = Array2::from_shape_fn((6, 5), |(r, c)| ((r + 1) * (c + 2)) as f64);
        let s = self_similarity(&a).unwrap();
        for i in 0..5 {
            assert_abs_diff_eq!(s[[i, i]], 1.0, epsilon = 1e-10);
            for j in 0..5 {
                assert_abs_diff_eq!(s[[i, j]], s[[j, i]], epsilon = 1e-10);
            }
        }
    }
}
