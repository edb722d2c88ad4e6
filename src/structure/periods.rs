//! Period estimation from a beat spectrum/spectrogram.

use ndarray::Array2;

use crate::error::{RepetError, Result};

/// For each column of `beat` (shape `[L, T]`, or `[L, 1]` for a single
/// spectrum), the row index (lag, in frames) of the argmax over
/// `p_lo+1 ..= min(p_hi, floor(L/3))`. The `+1` skips the zero-lag peak;
/// the `floor(L/3)` cap ensures at least three repetitions fit in the
/// window the period was estimated from. Ties: the first (lowest-lag)
/// maximum wins.
pub fn periods(beat: &Array2<f64>, p_lo: usize, p_hi: usize) -> Result<Vec<usize>> {
    let l = beat.nrows();
    let cap = p_hi.min(l / 3);
    let low = p_lo + 1;

    if low > cap {
        return Err(RepetError::DegenerateStructure(format!(
            "no period candidate in range [{low}, {cap}] (L={l})"
        )));
    }

    let mut out = Vec::with_capacity(beat.ncols());
    for col in beat.columns() {
        let mut best_row = low;
        let mut best_val = col[low];
        for row in (low + 1)..=cap {
            if col[row] > best_val {
                best_val = col[row];
                best_row = row;
            }
        }
        out.push(best_row);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_planted_peak() {
        let mut beat = Array2::<f64>::zeros((30, 1));
        beat[[7, 0]] = 5.0;
        let p = periods(&beat, 1, 10).unwrap();
        assert_eq!(p, vec![7]);
    }

    #[test]
    fn errors_when_range_is_empty() {
        let beat = Array2::<f64>::zeros((6, 1)); // floor(6/3) = 2
        assert!(periods(&beat, 5, 10).is_err());
    }

    #[test]
    fn ties_keep_the_lowest_lag() {
        let mut beat = Array2::<f64>::zeros((30, 1));
        beat[[3, 0]] = 2.0;
        beat[[9, 0]] = 2.0;
        let p = periods(&beat, 1, 10).unwrap();
        assert_eq!(p, vec![3]);
    }
}
