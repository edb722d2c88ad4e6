//! Tuning constants shared by the separation pipelines.
//!
//! [`RepetConfig`] keeps these as named fields in a single module-scope
//! structure rather than scattered free constants. Every pipeline accepts
//! an optional `&RepetConfig` via its `_with_config` sibling; the bare
//! function names use [`RepetConfig::default`], so callers are never
//! required to supply tuning parameters.

/// Tuning parameters for the REPET family of pipelines.
///
/// All fields default to the Rafii & Pardo reference implementation's
/// fixed-parameter table. Durations are expressed in seconds and converted
/// to frames or samples internally once the sampling frequency is known.
#[derive(Debug, Clone, PartialEq)]
pub struct RepetConfig {
    /// High-pass override cutoff, in Hz. Mask rows below this frequency are
    /// forced to 1.0 so low-frequency energy is always allocated to the
    /// background.
    pub cutoff_frequency_hz: f64,

    /// Inclusive repeating-period search range, in seconds. Used by
    /// `ORIGINAL`, `EXTENDED`, and `ADAPTIVE`.
    pub period_range_s: (f64, f64),

    /// Length of the sliding analysis window for the beat spectrogram, in
    /// seconds. Used by `EXTENDED` and `ADAPTIVE`.
    pub segment_length_s: f64,

    /// Hop between successive beat-spectrogram analysis windows, in
    /// seconds. Used by `EXTENDED` and `ADAPTIVE`.
    pub segment_step_s: f64,

    /// Number of frames contributing to the median in `ADAPTIVEMASK`,
    /// centered on each frame's estimated period.
    pub filter_order: usize,

    /// Minimum cosine-similarity value accepted by `LOCALMAXIMA` when
    /// picking repeating frames. Used by `SIM` and `SIMONLINE`.
    pub similarity_threshold: f64,

    /// Minimum separation between accepted similarity peaks, in seconds.
    /// Used by `SIM` and `SIMONLINE`.
    pub similarity_distance_s: f64,

    /// Maximum number of similar frames kept per frame. Used by `SIM` and
    /// `SIMONLINE`.
    pub similarity_number: usize,

    /// Length of `SIMONLINE`'s causal ring buffer, in seconds.
    pub buffer_length_s: f64,
}

impl Default for RepetConfig {
    fn default() -> Self {
        Self {
            cutoff_frequency_hz: 100.0,
            period_range_s: (1.0, 10.0),
            segment_length_s: 10.0,
            segment_step_s: 5.0,
            filter_order: 5,
            similarity_threshold: 0.0,
            similarity_distance_s: 1.0,
            similarity_number: 100,
            buffer_length_s: 10.0,
        }
    }
}

impl RepetConfig {
    /// `period_range_s` converted to an inclusive `[lo, hi]` frame range
    /// given a hop size in samples.
    pub(crate) fn period_range_frames(&self, hop: usize, fs: f64) -> (usize, usize) {
        let lo = (self.period_range_s.0 * fs / hop as f64).round().max(1.0) as usize;
        let hi = (self.period_range_s.1 * fs / hop as f64).round().max(1.0) as usize;
        (lo, hi)
    }

    pub(crate) fn segment_length_frames(&self, hop: usize, fs: f64) -> usize {
        ((self.segment_length_s * fs / hop as f64).round() as usize).max(1)
    }

    pub(crate) fn segment_step_frames(&self, hop: usize, fs: f64) -> usize {
        ((self.segment_step_s * fs / hop as f64).round() as usize).max(1)
    }

    pub(crate) fn similarity_distance_frames(&self, hop: usize, fs: f64) -> usize {
        ((self.similarity_distance_s * fs / hop as f64).round() as usize).max(1)
    }

    pub(crate) fn buffer_length_frames(&self, hop: usize, fs: f64) -> usize {
        ((self.buffer_length_s * fs / hop as f64).round() as usize).max(1)
    }
}
