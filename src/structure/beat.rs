//! Beat spectrum and beat spectrogram.

use ndarray::{s, Array2, Axis};

use super::acorr::acorr;
use crate::error::Result;

/// Mean, over frequency channels, of the unbiased autocorrelation of a
/// magnitude spectrogram `s` (shape `[F, T]`) along the time axis.
///
/// Returns a vector of length `T`. Callers square the spectrogram before
/// calling this to sharpen periodic peaks (done by the pipelines, not
/// here, so the primitive stays a pure function of its input).
pub fn beat_spectrum(s: &Array2<f64>) -> Result<Vec<f64>> {
    let transposed = s.t().to_owned(); // [T, F]: autocorrelate along time
    let a = acorr(&transposed)?; // [T, F]
    let t = a.nrows();
    let f = a.ncols().max(1) as f64;
    let mean = a.sum_axis(Axis(1)).mapv(|v| v / f);
    Ok(mean.to_vec().into_iter().take(t).collect())
}

/// Piecewise beat spectrum: every `segment_step` frames, the beat spectrum
/// of the length-`segment_length` window centered on that frame is
/// computed and held constant until the next anchor (block-constant
/// interpolation). Returns shape `[segment_length, T]`.
pub fn beat_spectrogram(
    s: &Array2<f64>,
    segment_length: usize,
    segment_step: usize,
) -> Result<Array2<f64>> {
    let (f, t) = s.dim();
    let l = segment_length;
    let left_pad = (l - 1).div_ceil(2);
    let right_pad = (l - 1) / 2;

    let mut padded = Array2::<f64>::zeros((f, t + left_pad + right_pad));
    padded
        .slice_mut(s![.., left_pad..left_pad + t])
        .assign(s);

    let mut out = Array2::<f64>::zeros((l, t));
    let mut anchor = 0usize;
    while anchor < t {
        let window = padded.slice(s![.., anchor..anchor + l]).to_owned();
        let bspec = beat_spectrum(&window)?;
        let end = (anchor + segment_step).min(t);
        for col in anchor..end {
            for row in 0..l {
                out[[row, col]] = bspec[row];
            }
        }
        anchor += segment_step;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat_spectrum_peaks_at_period() {
        // Magnitude spectrogram with a strong period-4 repetition in time.
        let t = 40;
        let mut s = Array2::<f64>::zeros((8, t));
        for col in 0..t {
            let v = if col % 4 == 0 { 1.0 } else { 0.1 };
            for row in 0..8 {
                s[[row, col]] = v;
            }
        }
        let bs = beat_spectrum(&s).unwrap();
        assert_eq!(bs.len(), t);
        // the lag-4 peak should exceed neighboring lags
        assert!(bs[4] > bs[2]);
        assert!(bs[4] > bs[6]);
    }

    #[test]
    fn beat_spectrogram_shape() {
        let s = Array2::<f64>::from_elem((8, 50), 1.0);
        let out = beat_spectrogram(&s, 12, 6).unwrap();
        assert_eq!(out.dim(), (12, 50));
    }
}
