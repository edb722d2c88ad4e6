//! REPET-family repeating-pattern audio source separation.
//!
//! Five pipelines separate a repeating musical background from a
//! non-repeating foreground in a multichannel audio signal, differing in
//! how they estimate repeating structure over time:
//!
//! - [`original`]: a single, global repeating period.
//! - [`extended`]: [`original`] over a sliding window, cross-faded back
//!   together, so the estimated period can drift over a long recording.
//! - [`adaptive`]: a per-frame period from a beat spectrogram.
//! - [`sim`]: non-periodic repetition via frame-to-frame cosine similarity.
//! - [`sim_online`]: a causal, bounded-memory variant of [`sim`] suitable
//!   for streaming.
//!
//! Every pipeline takes an `[N, C]` signal (`N` samples, `C` channels) and
//! its sampling frequency, and returns an equally-shaped estimate of the
//! repeating background; the foreground is `audio_signal - background`.
//! Each has a `_with_config` sibling accepting an explicit [`RepetConfig`]
//! for callers who need to override the default tuning constants.

mod config;
mod error;
mod mask;
mod pipeline;
mod structure;
mod transform;

pub use config::RepetConfig;
pub use error::{RepetError, Result};
pub use pipeline::{
    adaptive, adaptive_with_config, extended, extended_with_config, original,
    original_with_config, sim, sim_online, sim_online_with_config, sim_with_config,
};

/// Numerical primitives (STFT/ISTFT, autocorrelation, beat spectrum, mask
/// builders) underlying the pipelines, exposed for callers who want to
/// compose their own analysis rather than run a full pipeline.
pub mod primitives {
    pub use crate::structure::{
        acorr, beat_spectrogram, beat_spectrum, indices, local_maxima, periods, self_similarity,
        similarity,
    };
    pub use crate::transform::{istft, periodic_hamming, stft, window_size, StftParams};
}
