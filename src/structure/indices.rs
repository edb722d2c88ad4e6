//! Per-frame similarity indices.

use ndarray::Array2;

use super::local_maxima::local_maxima;

/// For each column `i` of a similarity matrix, the indices of its
/// constrained local maxima (self-matches at lag 0 fall out naturally:
/// either disqualified by the strict-inequality rule or excluded by the
/// minimum-separation window around the diagonal).
pub fn indices(similarity_matrix: &Array2<f64>, tau: f64, d: usize, k: usize) -> Vec<Vec<usize>> {
    similarity_matrix
        .columns()
        .into_iter()
        .map(|col| {
            let v: Vec<f64> = col.to_vec();
            local_maxima(&v, tau, d, k).1
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn returns_one_list_per_column() {
        let sim = array![[1.0, 0.2, 0.9], [0.2, 1.0, 0.1], [0.9, 0.1, 1.0]];
        let idx = indices(&sim, 0.0, 0, 10);
        assert_eq!(idx.len(), 3);
    }
}
