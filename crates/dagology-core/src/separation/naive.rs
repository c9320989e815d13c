//! Naive spacelike distances.
//!
//! For an incomparable pair `(i, j)` let `W` be the common past and `Z` the
//! common future. The distance is the smallest positive `LP[w, z]` over
//! `w ∈ W, z ∈ Z`, capped at `dmax`; when either set is empty it is
//! `dmax`. Cost is `O(|W|·|Z|)` per pair, which dominates on large
//! networks.

use tracing::instrument;

use crate::order::LongestPathMatrix;
use crate::separation::{CausalSets, SeparationMatrix, build_separations, intersection};

/// Build the naive separation matrix from longest paths.
#[must_use]
#[instrument(skip(lp), fields(n = lp.len()))]
pub fn naive_spacelike_matrix(lp: &LongestPathMatrix, dmax: Option<u32>) -> SeparationMatrix {
    let cap = dmax.unwrap_or_else(|| lp.diameter());
    let sets = CausalSets::new(lp);

    build_separations(lp, |i, j| {
        let common_past = intersection(&sets.past[i], &sets.past[j]);
        let common_future = intersection(&sets.future[i], &sets.future[j]);

        let mut distance = cap;
        for w in common_past.ones() {
            for z in common_future.ones() {
                let w_z = lp.get(w, z);
                if w_z > 0 {
                    distance = distance.min(w_z);
                }
            }
        }
        f64::from(distance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderMatrix, longest_path_matrix};

    fn lp_of(n: usize, edges: &[(usize, usize)]) -> LongestPathMatrix {
        let a = OrderMatrix::from_edges(n, edges.iter().copied()).expect("edges");
        longest_path_matrix(&a, None).expect("acyclic")
    }

    #[test]
    fn diamond_separations() {
        let lp = lp_of(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let ds2 = naive_spacelike_matrix(&lp, None);

        assert!((ds2[(1, 2)] - 4.0).abs() < 1e-12);
        assert!((ds2[(2, 1)] - 4.0).abs() < 1e-12);
        assert!((ds2[(0, 3)] + 4.0).abs() < 1e-12);
        assert!((ds2[(0, 1)] + 1.0).abs() < 1e-12);
        for i in 0..4 {
            assert!(ds2[(i, i)].abs() < f64::EPSILON);
        }
    }

    #[test]
    fn missing_common_past_uses_cap() {
        // 0 → 2, 1 → 2: 0 and 1 share a future but no past.
        let lp = lp_of(3, &[(0, 2), (1, 2)]);
        assert!((naive_spacelike_matrix(&lp, None)[(0, 1)] - 1.0).abs() < 1e-12);
        assert!((naive_spacelike_matrix(&lp, Some(7))[(0, 1)] - 49.0).abs() < 1e-12);
    }

    #[test]
    fn antichain_defaults_to_zero_cap() {
        let lp = lp_of(3, &[]);
        let ds2 = naive_spacelike_matrix(&lp, None);
        assert!(ds2.iter().all(|v| v.abs() < f64::EPSILON));
    }
}
