//! Fixed-period mask builder (`MASK`).

use ndarray::{s, Array2};

use super::median;
use crate::error::Result;

/// Ratio mask for a single fixed repeating period `p` (in frames).
///
/// `s` is a half-spectrum magnitude spectrogram `[F, T]`. Columns are
/// grouped into `G = ceil(T/p)` segments of length `p` (the last
/// right-padded with NaN); the repeating segment is the per-column median
/// across segments, computed separately for the columns where all `G`
/// segments have real data and the trailing columns where only the first
/// `G-1` segments do (a NaN-aware median, per DESIGN.md) — never a single
/// NaN-ignoring median over the whole padded tensor.
pub fn mask(s: &Array2<f64>, period: usize) -> Result<Array2<f64>> {
    let (f, t) = s.dim();
    let p = period.max(1);
    let g = t.div_ceil(p);
    let padded_width = g * p;

    let mut padded = Array2::<f64>::from_elem((f, padded_width), f64::NAN);
    padded.slice_mut(s![.., 0..t]).assign(s);

    let full_cols = t - (g - 1) * p; // columns with all G segments real

    let mut repeating_segment = Array2::<f64>::zeros((f, p));
    for c in 0..p {
        let segs = if c < full_cols { g } else { g.saturating_sub(1) };
        if segs == 0 {
            continue; // only reachable in the discarded padded tail
        }
        for fi in 0..f {
            let mut vals: Vec<f64> = (0..segs).map(|k| padded[[fi, c + k * p]]).collect();
            repeating_segment[[fi, c]] = median(&mut vals);
        }
    }

    let eps = f64::EPSILON;
    let mut out = Array2::<f64>::zeros((f, t));
    for col in 0..t {
        let seg_col = col % p;
        for fi in 0..f {
            let original = s[[fi, col]];
            let repeating = repeating_segment[[fi, seg_col]].min(original);
            out[[fi, col]] = (repeating + eps) / (original + eps);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mask_is_in_unit_interval_for_nonnegative_input() {
        let s = Array2::from_shape_fn((5, 40), |(f, t)| ((f + t) as f64 * 0.13).sin().abs());
        let m = mask(&s, 7).unwrap();
        for v in m.iter() {
            assert!(*v > 0.0 && *v <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn perfectly_periodic_signal_yields_mask_near_one() {
        let period = 6;
        let s = Array2::from_shape_fn((4, 36), |(f, t)| (f as f64 + 1.0) * (1.0 + (t % period) as f64));
        let m = mask(&s, period).unwrap();
        for v in m.iter() {
            assert_abs_diff_eq!(*v, 1.0, epsilon = 1e-9);
        }
    }
}
