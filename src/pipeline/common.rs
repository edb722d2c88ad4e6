//! Shared per-channel plumbing for the five separation pipelines: STFT
//! fan-out, magnitude averaging, mask epilogue (high-pass override, mirror,
//! apply, ISTFT).

use ndarray::{Array1, Array2, ArrayView1};
use rustfft::num_complex::Complex64;

use crate::error::{check_finite, RepetError, Result};
use crate::transform::{istft, stft, StftParams};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// STFT of every channel of `signal` (`[N, C]`). All channels share the
/// same frame geometry since they share a sample count and sampling rate.
pub(super) fn stft_per_channel(
    signal: &Array2<f64>,
    fs: f64,
) -> Result<(Vec<Array2<Complex64>>, StftParams)> {
    let (n, c) = signal.dim();
    if n == 0 || c == 0 {
        return Err(RepetError::InvalidInput(
            "audio signal must have at least one sample and one channel".into(),
        ));
    }

    let mut spectra = Vec::with_capacity(c);
    let mut params = None;
    for ch in 0..c {
        let column: Vec<f64> = signal.column(ch).to_vec();
        let (spec, p) = stft(&column, fs)?;
        spectra.push(spec);
        params = Some(p);
    }
    Ok((spectra, params.unwrap()))
}

/// Half-spectrum (`[0, W/2]`) magnitude of a full complex STFT.
pub(super) fn half_magnitude(spec: &Array2<Complex64>) -> Array2<f64> {
    let w = spec.nrows();
    let half = w / 2 + 1;
    spec.slice(ndarray::s![0..half, ..]).mapv(|v| v.norm())
}

/// Elementwise mean of a set of equally-shaped matrices (channel average).
pub(super) fn mean_over_channels(mats: &[Array2<f64>]) -> Array2<f64> {
    let mut sum = mats[0].clone();
    for m in &mats[1..] {
        sum += m;
    }
    sum / mats.len() as f64
}

/// Elementwise mean of each matrix's square (square each channel's magnitude
/// spectrogram, then average across channels). Not the same as squaring the
/// channel mean: `mean(x)^2 != mean(x^2)` whenever channels differ, so this
/// must be used wherever a per-channel magnitude is squared before being
/// averaged into a beat spectrum or beat spectrogram.
pub(super) fn mean_of_squares_over_channels(mats: &[Array2<f64>]) -> Array2<f64> {
    let mut sum = mats[0].mapv(|v| v * v);
    for m in &mats[1..] {
        sum += &m.mapv(|v| v * v);
    }
    sum / mats.len() as f64
}

/// Mirror a half-spectrum mask (`[W/2+1, T]`) to the full `W` bins by
/// concatenating rows `W/2-1 .. 1` in reverse. Bins 0 (DC) and `W/2`
/// (Nyquist) are never duplicated.
pub(super) fn mirror_to_full(half_mask: &Array2<f64>, w: usize) -> Array2<f64> {
    let t = half_mask.ncols();
    let mut full = Array2::<f64>::zeros((w, t));
    full.slice_mut(ndarray::s![0..=w / 2, ..])
        .assign(half_mask);
    for k in (w / 2 + 1)..w {
        let mirrored_row: ArrayView1<f64> = half_mask.row(w - k);
        full.row_mut(k).assign(&mirrored_row);
    }
    full
}

/// High-pass override: force mask rows `1 ..= cutoff_bin` to 1.0 for
/// columns `start_col..` so all low-frequency energy is allocated to the
/// background there, leaving row 0 (DC) computed normally. `cutoff_bin` is
/// clamped to the mask's row count. `start_col` lets `SIMONLINE` exempt its
/// all-zero warm-up columns, which must stay silent rather than be forced
/// to 1.0 under its causality contract.
pub(super) fn apply_high_pass_override_from(
    half_mask: &mut Array2<f64>,
    cutoff_bin: usize,
    start_col: usize,
) {
    let last_row = half_mask.nrows().saturating_sub(1);
    let hi = cutoff_bin.min(last_row);
    for row in 1..=hi {
        for col in start_col..half_mask.ncols() {
            half_mask[[row, col]] = 1.0;
        }
    }
}

/// [`apply_high_pass_override_from`] with `start_col = 0`.
pub(super) fn apply_high_pass_override(half_mask: &mut Array2<f64>, cutoff_bin: usize) {
    apply_high_pass_override_from(half_mask, cutoff_bin, 0);
}

/// `round(cutoff_hz * W / fs)`, the cutoff-bin formula used by `ORIGINAL`,
/// `EXTENDED`, and `ADAPTIVE`.
pub(super) fn cutoff_bin_round(cutoff_hz: f64, w: usize, fs: f64) -> usize {
    (cutoff_hz * w as f64 / fs).round() as usize
}

/// `ceil(cutoff_hz * (W-1) / fs)`, the cutoff-bin formula used by `SIM` and
/// `SIMONLINE`. Kept distinct from [`cutoff_bin_round`] rather than unified;
/// see DESIGN.md for why both formulas are reproduced verbatim.
pub(super) fn cutoff_bin_ceil(cutoff_hz: f64, w: usize, fs: f64) -> usize {
    (cutoff_hz * (w - 1) as f64 / fs).ceil() as usize
}

/// Run the shared epilogue (high-pass override, mirror, apply, ISTFT) for
/// one channel, given its already-computed half-spectrum mask. The
/// override is skipped for columns before `warmup_frames` (0 for every
/// pipeline except `SIMONLINE`).
fn finalize_channel(
    stft_channel: &Array2<Complex64>,
    mut half_mask: Array2<f64>,
    cutoff_bin: usize,
    warmup_frames: usize,
    params: &StftParams,
) -> Result<Array1<f64>> {
    apply_high_pass_override_from(&mut half_mask, cutoff_bin, warmup_frames);
    let full_mask = mirror_to_full(&half_mask, params.window_len);
    let masked = stft_channel * &full_mask.mapv(|v| Complex64::new(v, 0.0));
    let out = istft(masked.view(), params)?;
    check_finite(&out, "separation pipeline epilogue")?;
    Ok(Array1::from_vec(out))
}

/// Finalize every channel and stack the results back into `[N, C]`.
pub(super) fn finalize_channels(
    stft_channels: &[Array2<Complex64>],
    half_masks: Vec<Array2<f64>>,
    cutoff_bin: usize,
    params: &StftParams,
) -> Result<Array2<f64>> {
    finalize_channels_from(stft_channels, half_masks, cutoff_bin, 0, params)
}

/// As [`finalize_channels`], but the high-pass override only applies from
/// column `warmup_frames` onward (used by `SIMONLINE` to keep its warm-up
/// region silent rather than forced to 1.0).
pub(super) fn finalize_channels_from(
    stft_channels: &[Array2<Complex64>],
    half_masks: Vec<Array2<f64>>,
    cutoff_bin: usize,
    warmup_frames: usize,
    params: &StftParams,
) -> Result<Array2<f64>> {
    #[cfg(feature = "parallel")]
    let columns: Result<Vec<Array1<f64>>> = stft_channels
        .par_iter()
        .zip(half_masks.into_par_iter())
        .map(|(spec, mask)| finalize_channel(spec, mask, cutoff_bin, warmup_frames, params))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let columns: Result<Vec<Array1<f64>>> = stft_channels
        .iter()
        .zip(half_masks.into_iter())
        .map(|(spec, mask)| finalize_channel(spec, mask, cutoff_bin, warmup_frames, params))
        .collect();

    let columns = columns?;
    let n = params.signal_len;
    let c = columns.len();
    let mut out = Array2::<f64>::zeros((n, c));
    for (ch, col) in columns.into_iter().enumerate() {
        out.column_mut(ch).assign(&col);
    }
    Ok(out)
}

pub(super) fn validate_signal(signal: &Array2<f64>, fs: f64) -> Result<()> {
    if fs <= 0.0 {
        return Err(RepetError::InvalidInput(
            "sampling frequency must be positive".into(),
        ));
    }
    if signal.is_empty() {
        return Err(RepetError::InvalidInput("audio signal is empty".into()));
    }
    if !signal.iter().all(|v| v.is_finite()) {
        return Err(RepetError::InvalidInput(
            "audio signal contains non-finite samples".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_squares_differs_from_square_of_mean() {
        // Two channels with magnitudes 2 and 0 at a single bin: squaring
        // each channel before averaging gives (4 + 0) / 2 = 2, not
        // ((2 + 0) / 2)^2 = 1. Confirms the two orderings are not
        // interchangeable for non-identical channel content.
        let a = Array2::from_shape_vec((1, 1), vec![2.0]).unwrap();
        let b = Array2::from_shape_vec((1, 1), vec![0.0]).unwrap();
        let mats = vec![a, b];

        let correct = mean_of_squares_over_channels(&mats);
        assert_eq!(correct[[0, 0]], 2.0);

        let wrong = mean_over_channels(&mats).mapv(|v| v * v);
        assert_eq!(wrong[[0, 0]], 1.0);
        assert_ne!(correct[[0, 0]], wrong[[0, 0]]);
    }
}
