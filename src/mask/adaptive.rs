//! Time-varying-period mask builder (`ADAPTIVEMASK`).

use ndarray::Array2;

use super::median;
use crate::error::Result;

/// Ratio mask for a per-frame time-varying period.
///
/// For frame `i` with period `periods[i]`, the lookup set is
/// `{ i + k*period : k in 1-ceil(F0/2) ..= F0-ceil(F0/2) }` clipped to
/// `[0, T)` (`F0` = `filter_order`); the repeating column is the
/// per-frequency median over that (variable-width) set.
pub fn adaptive_mask(s: &Array2<f64>, periods: &[usize], filter_order: usize) -> Result<Array2<f64>> {
    let (f, t) = s.dim();
    let half = (filter_order as f64 / 2.0).ceil() as i64;
    let center_indices: Vec<i64> = (1 - half..=(filter_order as i64 - half)).collect();

    let eps = f64::EPSILON;
    let mut out = Array2::<f64>::zeros((f, t));

    for i in 0..t {
        let period = periods[i] as i64;
        let mut lookup: Vec<usize> = center_indices
            .iter()
            .filter_map(|&k| {
                let idx = i as i64 + k * period;
                (idx >= 0 && idx < t as i64).then_some(idx as usize)
            })
            .collect();
        if lookup.is_empty() {
            lookup.push(i);
        }

        for fi in 0..f {
            let mut vals: Vec<f64> = lookup.iter().map(|&j| s[[fi, j]]).collect();
            let repeating = median(&mut vals).min(s[[fi, i]]);
            out[[fi, i]] = (repeating + eps) / (s[[fi, i]] + eps);
        }
    }
    Ok(out)
}
