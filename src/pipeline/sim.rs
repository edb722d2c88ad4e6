//! `SIM`: non-periodic repetition via a self-similarity matrix.

use ndarray::Array2;

use super::common::{
    cutoff_bin_ceil, finalize_channels, half_magnitude, mean_over_channels, stft_per_channel,
    validate_signal,
};
use crate::config::RepetConfig;
use crate::error::{RepetError, Result};
use crate::mask::sim_mask;
use crate::structure::{indices, self_similarity};

/// Separate the repeating background using cosine self-similarity between
/// frames instead of a fixed or time-varying period.
pub fn sim(audio_signal: &Array2<f64>, sampling_frequency: f64) -> Result<Array2<f64>> {
    sim_with_config(audio_signal, sampling_frequency, &RepetConfig::default())
}

/// As [`sim`], with an explicit [`RepetConfig`].
pub fn sim_with_config(
    audio_signal: &Array2<f64>,
    sampling_frequency: f64,
    config: &RepetConfig,
) -> Result<Array2<f64>> {
    validate_signal(audio_signal, sampling_frequency)?;

    let (spectra, params) = stft_per_channel(audio_signal, sampling_frequency)?;
    let magnitudes: Vec<Array2<f64>> = spectra.iter().map(half_magnitude).collect();
    let mean_mag = mean_over_channels(&magnitudes);

    let similarity_matrix = self_similarity(&mean_mag)?;
    let distance = config.similarity_distance_frames(params.hop, params.fs);
    let similarity_indices = indices(
        &similarity_matrix,
        config.similarity_threshold,
        distance,
        config.similarity_number,
    );

    if similarity_indices.iter().all(|v| v.is_empty()) {
        return Err(RepetError::DegenerateStructure(
            "no similar frames found within the configured search range".into(),
        ));
    }
    tracing::debug!(
        frames = similarity_indices.len(),
        "SIM: extracted per-frame similarity indices"
    );

    // SIM's cutoff bin uses ceil((W-1)*cutoff/fs) rather than round(W*cutoff/fs);
    // preserved verbatim rather than unified (see DESIGN.md).
    let cutoff_bin = cutoff_bin_ceil(config.cutoff_frequency_hz, params.window_len, params.fs);
    let half_masks: Vec<Array2<f64>> = magnitudes
        .iter()
        .map(|m| sim_mask(m, &similarity_indices))
        .collect::<Result<_>>()?;

    finalize_channels(&spectra, half_masks, cutoff_bin, &params)
}
