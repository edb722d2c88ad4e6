//! Centered, COLA-normalized short-time Fourier transform.
//!
//! A planner is created once per call and reused across frames, the window
//! is precomputed, and buffers are sized up front. Because the mask is
//! mirrored to the full `W` bins before multiplication (see DESIGN.md), this
//! is a full complex-to-complex transform via `rustfft` rather than a
//! real-to-complex one.

use ndarray::{Array2, ArrayView2};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::{RepetError, Result};
use crate::transform::window::{periodic_hamming, window_size};

/// Frame-geometry parameters derived from a call to [`stft`], needed to
/// invert it with [`istft`].
pub struct StftParams {
    pub fs: f64,
    pub window_len: usize,
    pub hop: usize,
    pub pad: usize,
    pub num_frames: usize,
    pub signal_len: usize,
    window: Vec<f64>,
}

impl StftParams {
    /// COLA normalization gain: the sum of two half-overlapping window
    /// samples, constant across the signal for a periodic window at 50%
    /// overlap.
    fn cola_gain(&self) -> f64 {
        self.window[0] + self.window[self.hop]
    }
}

/// Forward STFT of a single-channel signal.
///
/// Zero-pads the signal by `pad = W/2` on both ends (plus enough trailing
/// zeros for full frame coverage), windows and FFTs each hop-spaced frame,
/// and returns the full `[W, T]` complex spectrogram.
pub fn stft(signal: &[f64], fs: f64) -> Result<(Array2<Complex64>, StftParams)> {
    if fs <= 0.0 {
        return Err(RepetError::InvalidInput(
            "sampling frequency must be positive".into(),
        ));
    }
    if signal.is_empty() {
        return Err(RepetError::InvalidInput("signal is empty".into()));
    }

    let w = window_size(fs);
    if signal.len() < w {
        return Err(RepetError::InvalidInput(format!(
            "signal has {} samples, shorter than one analysis window of {}",
            signal.len(),
            w
        )));
    }

    let hop = w / 2;
    let pad = w / 2;
    let window = periodic_hamming(w);
    let n = signal.len();

    // T = ceil((N + 2P - W) / H) + 1; since 2P == W this reduces to
    // ceil(N / H) + 1, but the literal form is kept for clarity.
    let coverage = (n + 2 * pad) as i64 - w as i64;
    let num_frames = ((coverage + hop as i64 - 1) / hop as i64 + 1) as usize;

    let padded_len = (num_frames - 1) * hop + w;
    let mut padded = vec![0.0f64; padded_len];
    padded[pad..pad + n].copy_from_slice(signal);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(w);

    let mut out = Array2::<Complex64>::zeros((w, num_frames));
    let mut frame = vec![Complex64::new(0.0, 0.0); w];
    for j in 0..num_frames {
        let start = j * hop;
        for k in 0..w {
            frame[k] = Complex64::new(padded[start + k] * window[k], 0.0);
        }
        fft.process(&mut frame);
        out.column_mut(j).assign(&ndarray::ArrayView1::from(&frame));
    }

    Ok((
        out,
        StftParams {
            fs,
            window_len: w,
            hop,
            pad,
            num_frames,
            signal_len: n,
            window,
        },
    ))
}

/// Inverse STFT: overlap-add, COLA-normalize, strip the forward padding.
///
/// Returns a signal of length `>= params.signal_len`; callers truncate (or
/// zero-pad, in the unlikely event it is short) to the original sample
/// count.
pub fn istft(spectrogram: ArrayView2<Complex64>, params: &StftParams) -> Result<Vec<f64>> {
    let w = params.window_len;
    let hop = params.hop;
    let t = spectrogram.ncols();
    if spectrogram.nrows() != w {
        return Err(RepetError::InvalidInput(format!(
            "spectrogram has {} rows, expected {}",
            spectrogram.nrows(),
            w
        )));
    }

    let buffer_len = (t - 1) * hop + w;
    let mut buffer = vec![0.0f64; buffer_len];

    let mut planner = FftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(w);
    let scale = 1.0 / w as f64;

    let mut frame = vec![Complex64::new(0.0, 0.0); w];
    for j in 0..t {
        for k in 0..w {
            frame[k] = spectrogram[[k, j]];
        }
        ifft.process(&mut frame);
        let start = j * hop;
        for k in 0..w {
            buffer[start + k] += frame[k].re * scale;
        }
    }

    let gain = params.cola_gain();
    if gain == 0.0 {
        return Err(RepetError::NumericOverflow("istft COLA gain".into()));
    }
    for v in buffer.iter_mut() {
        *v /= gain;
    }

    let pad = params.pad;
    let core = &buffer[pad..buffer_len - pad];

    let mut result = vec![0.0; params.signal_len];
    let copy_len = core.len().min(params.signal_len);
    result[..copy_len].copy_from_slice(&core[..copy_len]);
    Ok(result)
}
