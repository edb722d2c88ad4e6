//! `SIMONLINE`: causal, frame-by-frame `SIM` over a ring buffer.
//!
//! The ring buffer owns the causality constraint, not the reconstruction
//! arithmetic: once a frame's mask column is decided using only ring
//! contents written by frames `<= i`, the shared COLA overlap-add epilogue
//! inverts the masked spectrogram exactly as the other four pipelines do,
//! which is also where "divide by the COLA gain once at the end, not per
//! frame" falls out for free.

use ndarray::{Array2, Axis};

use super::common::{
    cutoff_bin_ceil, finalize_channels_from, half_magnitude, mean_over_channels,
    stft_per_channel, validate_signal,
};
use crate::config::RepetConfig;
use crate::error::{RepetError, Result};
use crate::structure::{local_maxima, similarity};

/// Median of `values`, sorting in place. `values` must be non-empty.
/// Duplicated from [`crate::mask`]'s private helper rather than exposed
/// across the module boundary for one call site.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// A fixed-capacity cyclic store of past magnitude-spectrum frames, indexed
/// modulo its capacity. Frame `i` (0-indexed) lives in slot
/// `i mod capacity`.
struct RingBuffer {
    columns: Array2<f64>,
    capacity: usize,
}

impl RingBuffer {
    fn new(rows: usize, capacity: usize) -> Self {
        Self {
            columns: Array2::zeros((rows, capacity)),
            capacity,
        }
    }

    fn slot_of(&self, frame_index: usize) -> usize {
        frame_index % self.capacity
    }

    fn write(&mut self, frame_index: usize, column: ndarray::ArrayView1<f64>) {
        let slot = self.slot_of(frame_index);
        self.columns.column_mut(slot).assign(&column);
    }
}

/// Separate the repeating background causally: frame `j`'s output depends
/// only on input samples up to `j`'s analysis window, via a bounded-memory
/// ring buffer of past magnitude frames.
pub fn sim_online(audio_signal: &Array2<f64>, sampling_frequency: f64) -> Result<Array2<f64>> {
    sim_online_with_config(audio_signal, sampling_frequency, &RepetConfig::default())
}

/// As [`sim_online`], with an explicit [`RepetConfig`].
pub fn sim_online_with_config(
    audio_signal: &Array2<f64>,
    sampling_frequency: f64,
    config: &RepetConfig,
) -> Result<Array2<f64>> {
    validate_signal(audio_signal, sampling_frequency)?;

    let (spectra, params) = stft_per_channel(audio_signal, sampling_frequency)?;
    let magnitudes: Vec<Array2<f64>> = spectra.iter().map(half_magnitude).collect();
    let mean_mag = mean_over_channels(&magnitudes);

    let (f_half, t) = mean_mag.dim();
    let c = magnitudes.len();
    let buffer_len = config.buffer_length_frames(params.hop, params.fs).min(t.max(1));
    let warmup_frames = buffer_len.saturating_sub(1);

    let mut avg_ring = RingBuffer::new(f_half, buffer_len);
    let mut channel_rings: Vec<RingBuffer> = (0..c).map(|_| RingBuffer::new(f_half, buffer_len)).collect();

    let distance = config.similarity_distance_frames(params.hop, params.fs);
    let tau = config.similarity_threshold;
    let number = config.similarity_number;
    let eps = f64::EPSILON;

    let mut half_masks: Vec<Array2<f64>> = (0..c).map(|_| Array2::zeros((f_half, t))).collect();
    let mut found_any = false;

    for i in 0..t {
        avg_ring.write(i, mean_mag.column(i));
        for (ch, ring) in channel_rings.iter_mut().enumerate() {
            ring.write(i, magnitudes[ch].column(i));
        }

        if i < warmup_frames {
            continue; // warm-up: mask stays zero, per the causality contract
        }

        let slot = avg_ring.slot_of(i);

        // Ring slots cycle with frame index, so consecutive slots are
        // consecutive in time except across the wrap point. Reorder into a
        // chronological [F, B] window (oldest first, current frame last) so
        // `distance` means actual frame separation, not raw slot distance.
        let oldest_slot = (i + 1) % buffer_len;
        let order: Vec<usize> = (0..buffer_len).map(|k| (oldest_slot + k) % buffer_len).collect();
        let ordered_avg = Array2::from_shape_fn((f_half, buffer_len), |(fi, k)| {
            avg_ring.columns[[fi, order[k]]]
        });

        let current_mat = avg_ring.columns.column(slot).to_owned().insert_axis(Axis(1));
        let sim_row = similarity(&current_mat, &ordered_avg)?;
        let sim_vec: Vec<f64> = sim_row.row(0).to_vec();

        let (_, ordered_indices) = local_maxima(&sim_vec, tau, distance, number);
        if !ordered_indices.is_empty() {
            found_any = true;
        }
        let indices: Vec<usize> = if ordered_indices.is_empty() {
            vec![slot]
        } else {
            ordered_indices.iter().map(|&k| order[k]).collect()
        };

        for (ch, ring) in channel_rings.iter().enumerate() {
            for fi in 0..f_half {
                let mut vals: Vec<f64> = indices.iter().map(|&s| ring.columns[[fi, s]]).collect();
                let current_val = ring.columns[[fi, slot]];
                let repeating = median(&mut vals).min(current_val);
                half_masks[ch][[fi, i]] = (repeating + eps) / (current_val + eps);
            }
        }
    }

    if t > warmup_frames && !found_any {
        return Err(RepetError::DegenerateStructure(
            "no similar past frames found within the configured search range".into(),
        ));
    }
    tracing::debug!(
        buffer_len,
        warmup_frames,
        frames = t,
        "SIMONLINE: processed causal frames"
    );

    let cutoff_bin = cutoff_bin_ceil(config.cutoff_frequency_hz, params.window_len, params.fs);
    finalize_channels_from(&spectra, half_masks, cutoff_bin, warmup_frames, &params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_train(period: usize, n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| if i % period == 0 { amplitude } else { 0.0 })
            .collect()
    }

    #[test]
    fn warmup_region_is_silent() {
        let fs = 8000.0;
        // Long enough that the default 10s buffer_length never gets clamped
        // to the signal's own (much shorter) frame count.
        let n = 100_000;
        let signal = impulse_train(1600, n, 0.6);
        let audio = Array2::from_shape_vec((n, 1), signal).unwrap();

        let background = sim_online(&audio, fs).unwrap();
        let hop = crate::transform::window_size(fs) / 2;
        let config = RepetConfig::default();
        let buffer_len = config.buffer_length_frames(hop, fs);

        // Columns 0..buffer_len-2 carry an all-zero mask; the centered,
        // 50%-overlap COLA window means only output samples strictly
        // before the *first active* frame's window reach are guaranteed
        // silent, i.e. up to (buffer_len - 2) * hop rather than the naive
        // (buffer_len - 1) * hop (the active frame's window starts
        // overlapping one hop earlier than its own center).
        let silent_samples = buffer_len.saturating_sub(2) * hop;
        for s in 0..silent_samples.min(n) {
            assert_eq!(background[[s, 0]], 0.0);
        }
    }

    #[test]
    fn output_is_finite_and_correctly_shaped() {
        let fs = 8000.0;
        let n = 100_000;
        let signal = impulse_train(2000, n, 0.5);
        let audio = Array2::from_shape_vec((n, 1), signal).unwrap();
        let background = sim_online(&audio, fs).unwrap();
        assert_eq!(background.dim(), (n, 1));
        assert!(background.iter().all(|v| v.is_finite()));
    }
}
