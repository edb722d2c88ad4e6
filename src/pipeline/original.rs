//! `ORIGINAL`: single global repeating period.

use ndarray::Array2;

use super::common::{
    cutoff_bin_round, finalize_channels, half_magnitude, mean_of_squares_over_channels,
    stft_per_channel, validate_signal,
};
use crate::config::RepetConfig;
use crate::error::Result;
use crate::mask::mask;
use crate::structure::{beat_spectrum, periods};

/// Separate the repeating background using a single, global repeating
/// period estimated from the channel-averaged beat spectrum.
pub fn original(audio_signal: &Array2<f64>, sampling_frequency: f64) -> Result<Array2<f64>> {
    original_with_config(audio_signal, sampling_frequency, &RepetConfig::default())
}

/// As [`original`], with an explicit [`RepetConfig`].
pub fn original_with_config(
    audio_signal: &Array2<f64>,
    sampling_frequency: f64,
    config: &RepetConfig,
) -> Result<Array2<f64>> {
    validate_signal(audio_signal, sampling_frequency)?;

    let (spectra, params) = stft_per_channel(audio_signal, sampling_frequency)?;
    let magnitudes: Vec<Array2<f64>> = spectra.iter().map(half_magnitude).collect();
    let squared = mean_of_squares_over_channels(&magnitudes);

    let beat = beat_spectrum(&squared)?;
    let t = beat.len();
    let beat_column = Array2::from_shape_vec((t, 1), beat)
        .expect("beat_spectrum length matches its own column count");

    let (p_lo, p_hi) = config.period_range_frames(params.hop, params.fs);
    let period = periods(&beat_column, p_lo, p_hi)?[0];
    tracing::debug!(period_frames = period, "ORIGINAL: estimated repeating period");

    let cutoff_bin = cutoff_bin_round(config.cutoff_frequency_hz, params.window_len, params.fs);
    let half_masks: Vec<Array2<f64>> = magnitudes
        .iter()
        .map(|m| mask(m, period))
        .collect::<Result<_>>()?;

    finalize_channels(&spectra, half_masks, cutoff_bin, &params)
}
