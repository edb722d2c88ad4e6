//! Time–frequency transform layer: centered STFT/ISTFT and window
//! generation.

mod stft;
mod window;

pub use stft::{istft, stft, StftParams};
pub use window::{periodic_hamming, window_size};
