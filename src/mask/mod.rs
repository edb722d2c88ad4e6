//! Mask builders: fixed-period, adaptive (time-varying period), and
//! similarity-indexed repeating-spectrogram ratio masks.

mod adaptive;
mod fixed;
mod sim;

pub use adaptive::adaptive_mask;
pub use fixed::mask;
pub use sim::sim_mask;

/// Median of `values`, sorting in place. `values` must be non-empty.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
