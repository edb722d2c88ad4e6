//! Periodic window generation for the analysis/synthesis transform.
//!
//! The reference window is a periodic Hamming window at 50% overlap, which
//! satisfies COLA (constant overlap-add) exactly up to a scalar gain. The
//! formula below divides by `N` rather than `N-1` — the "periodic" rather
//! than "symmetric" convention.

use std::f64::consts::PI;

/// Window size in samples: `2^ceil(log2(0.04 * fs))`.
///
/// Rounds the nominal 40ms analysis window up to the next power of two so
/// the FFT size is always a power of two.
pub fn window_size(fs: f64) -> usize {
    let nominal = 0.04 * fs;
    let exponent = nominal.max(1.0).log2().ceil() as u32;
    1usize << exponent
}

/// Periodic Hamming window of length `size`.
///
/// `w[n] = 0.54 - 0.46*cos(2*pi*n/size)` for `n = 0..size`. Dividing by
/// `size` rather than `size - 1` makes the window periodic, which is what
/// COLA reconstruction at 50% hop requires.
pub fn periodic_hamming(size: usize) -> Vec<f64> {
    let n = size as f64;
    (0..size)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / n).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn window_size_is_power_of_two() {
        let w = window_size(8000.0);
        assert_eq!(w, w.next_power_of_two());
        assert_eq!(w, 512); // 0.04 * 8000 = 320 -> next pow2 = 512
    }

    #[test]
    fn hamming_endpoints() {
        let w = periodic_hamming(8);
        assert_abs_diff_eq!(w[0], 0.08, epsilon = 1e-12);
        // periodic convention: w[size] would equal w[0], w[size-1] != w[0]
        assert!(w[w.len() - 1] > w[0]);
    }
}
