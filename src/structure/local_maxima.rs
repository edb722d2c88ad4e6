//! Constrained local-maxima picking.

/// Local maxima of `v` at or above `tau`, each strictly greater than every
/// neighbor within `+-d` (clipped to the vector's bounds), keeping at most
/// the top `k` by value.
///
/// Returns `(values, indices)`, both sorted descending by value. Indices
/// are *not* re-sorted into time order — callers must not assume temporal
/// ordering.
pub fn local_maxima(v: &[f64], tau: f64, d: usize, k: usize) -> (Vec<f64>, Vec<usize>) {
    let n = v.len();
    let mut candidates: Vec<(f64, usize)> = Vec::new();

    for i in 0..n {
        if v[i] < tau {
            continue;
        }
        let lo = i.saturating_sub(d);
        let hi = (i + d).min(n.saturating_sub(1));
        let is_peak = (lo..=hi)
            .filter(|&j| j != i)
            .all(|j| v[i] > v[j]);
        if is_peak {
            candidates.push((v[i], i));
        }
    }

    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(k);

    let values = candidates.iter().map(|(val, _)| *val).collect();
    let indices = candidates.iter().map(|(_, idx)| *idx).collect();
    (values, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_strict_peaks_above_threshold() {
        let v = vec![0.0, 1.0, 0.0, 2.0, 2.0, 0.0, 3.0, 0.0];
        // index 4 is disqualified: v[4] == v[3], not a strict peak either side
        let (values, indices) = local_maxima(&v, 0.5, 1, 10);
        assert_eq!(values, vec![3.0, 1.0]);
        assert_eq!(indices, vec![6, 1]);
    }

    #[test]
    fn caps_at_k() {
        let v = vec![5.0, 0.0, 4.0, 0.0, 3.0, 0.0, 2.0];
        let (values, indices) = local_maxima(&v, 0.0, 1, 2);
        assert_eq!(values.len(), 2);
        assert_eq!(indices.len(), 2);
        assert_eq!(values, vec![5.0, 4.0]);
    }

    #[test]
    fn respects_minimum_separation() {
        let v = vec![1.0, 3.0, 1.0, 3.1, 1.0];
        let (values, _) = local_maxima(&v, 0.0, 3, 10);
        // distance-3 window around index 1 includes index 3, whose slightly
        // higher value disqualifies index 1 as a peak
        assert_eq!(values, vec![3.1]);
    }
}
