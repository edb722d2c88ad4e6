//! `EXTENDED`: sliding-window `ORIGINAL` with triangular overlap-add.

use ndarray::{s, Array2};

use super::common::validate_signal;
use super::original::original_with_config;
use crate::config::RepetConfig;
use crate::error::{RepetError, Result};

/// Separate the repeating background by applying [`original`](super::original)
/// over a sliding window and reassembling with a triangular cross-fade,
/// letting the estimated period track changes in repeating content over
/// time.
pub fn extended(audio_signal: &Array2<f64>, sampling_frequency: f64) -> Result<Array2<f64>> {
    extended_with_config(audio_signal, sampling_frequency, &RepetConfig::default())
}

/// As [`extended`], with an explicit [`RepetConfig`].
pub fn extended_with_config(
    audio_signal: &Array2<f64>,
    sampling_frequency: f64,
    config: &RepetConfig,
) -> Result<Array2<f64>> {
    validate_signal(audio_signal, sampling_frequency)?;
    let (n, c) = audio_signal.dim();
    let fs = sampling_frequency;

    let length = (config.segment_length_s * fs).round() as usize;
    let step = (config.segment_step_s * fs).round() as usize;

    if n < length + step {
        tracing::warn!(
            n,
            length,
            step,
            "EXTENDED: signal shorter than one segment plus hop, falling back to single-segment mode"
        );
        return original_with_config(audio_signal, fs, config);
    }

    let overlap = length.saturating_sub(step);
    if overlap == 0 {
        return Err(RepetError::InvalidInput(
            "segment_step must be shorter than segment_length for overlap-add".into(),
        ));
    }

    // Every segment but the last is exactly `length` samples; the last
    // absorbs whatever remains of the signal.
    let mut starts = vec![0usize];
    loop {
        let last = *starts.last().unwrap();
        if last + length + step <= n {
            starts.push(last + step);
        } else {
            break;
        }
    }
    let num_segments = starts.len();

    let mut output = Array2::<f64>::zeros((n, c));
    for (i, &start) in starts.iter().enumerate() {
        let end = if i == num_segments - 1 {
            n
        } else {
            start + length
        };
        let seg_len = end - start;

        let segment = audio_signal.slice(s![start..end, ..]).to_owned();
        let separated = original_with_config(&segment, fs, config)?;

        let weight = crossfade_weights(seg_len, overlap, i > 0, i < num_segments - 1);
        for ch in 0..c {
            for k in 0..seg_len {
                output[[start + k, ch]] += separated[[k, ch]] * weight[k];
            }
        }
    }

    if !output.iter().all(|v| v.is_finite()) {
        return Err(RepetError::NumericOverflow("EXTENDED overlap-add".into()));
    }
    Ok(output)
}

/// Per-sample gain for one segment of length `seg_len`: a ramp up over the
/// left `overlap` samples (skipped for the first segment, whose left half
/// is direct) and a ramp down over the right `overlap` samples (skipped
/// for the last segment, since nothing follows it to cross-fade with).
/// Matching ramps from adjacent segments sum to unit gain in the overlap.
fn crossfade_weights(seg_len: usize, overlap: usize, taper_left: bool, taper_right: bool) -> Vec<f64> {
    let mut weight = vec![1.0f64; seg_len];
    let ov = overlap.min(seg_len);

    if taper_left {
        for k in 0..ov {
            weight[k] = (k as f64 + 0.5) / overlap as f64;
        }
    }
    if taper_right {
        for k in 0..ov {
            let ascending = (k as f64 + 0.5) / overlap as f64;
            weight[seg_len - ov + k] = 1.0 - ascending;
        }
    }
    weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossfade_ramps_sum_to_unity() {
        let overlap = 10;
        let left = crossfade_weights(40, overlap, false, true); // first segment
        let right = crossfade_weights(40, overlap, true, false); // second segment
        for k in 0..overlap {
            let a = left[40 - overlap + k];
            let b = right[k];
            assert!((a + b - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn short_signal_falls_back_to_single_segment() {
        let fs = 8000.0;
        let n = 32000; // 4s, shorter than the default 15s segment_length + segment_step
        let signal: Vec<f64> = (0..n)
            .map(|i| 0.3 * (2.0 * std::f64::consts::PI * 300.0 * i as f64 / fs).sin())
            .collect();
        let audio = Array2::from_shape_vec((n, 1), signal).unwrap();
        let result = extended(&audio, fs);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().dim(), (n, 1));
    }
}
