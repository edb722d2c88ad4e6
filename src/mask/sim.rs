//! Similarity-indexed mask builder (`SIMMASK`).

use ndarray::Array2;

use super::median;
use crate::error::Result;

/// Ratio mask built from per-frame similarity indices.
///
/// For frame `i`, the repeating column is the per-frequency median over
/// `indices[i]`'s columns. A frame with no similar frames falls back to
/// itself (the same median-over-a-single-value degenerate case the
/// adaptive mask handles), rather than failing the whole pipeline over one
/// frame with no repeating match.
pub fn sim_mask(s: &Array2<f64>, indices: &[Vec<usize>]) -> Result<Array2<f64>> {
    let (f, t) = s.dim();
    let eps = f64::EPSILON;
    let mut out = Array2::<f64>::zeros((f, t));

    for i in 0..t {
        let cols: &[usize] = if indices[i].is_empty() {
            std::slice::from_ref(&i)
        } else {
            &indices[i]
        };

        for fi in 0..f {
            let mut vals: Vec<f64> = cols.iter().map(|&j| s[[fi, j]]).collect();
            let repeating = median(&mut vals).min(s[[fi, i]]);
            out[[fi, i]] = (repeating + eps) / (s[[fi, i]] + eps);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_is_in_unit_interval() {
        let s = Array2::from_shape_fn((4, 10), |(f, t)| ((f + t) as f64 * 0.2).sin().abs());
        let indices: Vec<Vec<usize>> = (0..10).map(|i| vec![i]).collect();
        let m = sim_mask(&s, &indices).unwrap();
        for v in m.iter() {
            assert!(*v > 0.0 && *v <= 1.0 + 1e-9);
        }
    }
}
