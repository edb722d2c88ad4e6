//! Unbiased autocorrelation via the Wiener–Khinchin theorem.

use ndarray::Array2;
use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

use crate::error::Result;

/// Column-wise unbiased autocorrelation of `x` (shape `[R, C]`).
///
/// Each column is zero-padded to `2R`, FFT'd, turned into a power spectral
/// density, inverse-FFT'd, and the first `R` (real-part) rows are divided
/// by `R - r` to undo the bias of a finite-length estimate. `O(R*C*log(R))`.
pub fn acorr(x: &Array2<f64>) -> Result<Array2<f64>> {
    let (r, c) = x.dim();
    let padded_len = 2 * r;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(padded_len);
    let ifft = planner.plan_fft_inverse(padded_len);
    let scale = 1.0 / padded_len as f64;

    let mut out = Array2::<f64>::zeros((r, c));
    let mut column = vec![Complex64::new(0.0, 0.0); padded_len];

    for ci in 0..c {
        for ri in 0..r {
            column[ri] = Complex64::new(x[[ri, ci]], 0.0);
        }
        for v in column.iter_mut().skip(r) {
            *v = Complex64::new(0.0, 0.0);
        }

        fft.process(&mut column);
        for v in column.iter_mut() {
            let psd = v.norm_sqr();
            *v = Complex64::new(psd, 0.0);
        }
        ifft.process(&mut column);

        for ri in 0..r {
            let unbiased = (r - ri) as f64;
            out[[ri, ci]] = column[ri].re * scale / unbiased;
        }
    }

    Ok(out)
}
