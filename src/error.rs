//! Error taxonomy for the REPET pipelines.
//!
//! Every public entry point returns [`Result`] instead of panicking on
//! malformed input: boundary failures are `InvalidInput`, a search that
//! turns up no periodic or similar structure is `DegenerateStructure`, and a
//! non-finite value slipping through an ε-regularized ratio is
//! `NumericOverflow`. Nothing is retried internally.

/// Errors produced by the REPET pipelines and their primitives.
#[derive(Debug, thiserror::Error)]
pub enum RepetError {
    /// Shape, range, or type error at the call boundary (empty signal,
    /// non-positive sample rate, signal shorter than one analysis window,
    /// non-finite input samples).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The beat spectrogram or similarity search found no candidate
    /// period/index within the configured range.
    #[error("degenerate repetition structure: {0}")]
    DegenerateStructure(String),

    /// A non-finite value was detected in an output that should be
    /// impossible given ε-regularized ratios.
    #[error("non-finite value produced during {0}")]
    NumericOverflow(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RepetError>;

pub(crate) fn check_finite(data: &[f64], where_: &str) -> Result<()> {
    if data.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(RepetError::NumericOverflow(where_.to_string()))
    }
}
