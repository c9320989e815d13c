//! Midpoint-scaling dimension.
//!
//! # Algorithm
//!
//! 1. Take a longest path `u → … → v`; fewer than 5 nodes is too coarse and
//!    yields 0.
//! 2. `I = [u, v]`, the causal interval between the endpoints.
//! 3. For each `w` on the path measure `|[u, w]|` and `|[w, v]|`; the
//!    midpoint is the first `w` maximising the smaller of the two.
//! 4. Halving proper time scales interval volume by `2^D`:
//!
//! ```text
//! D = log2(|I| / (|[u, w]| + |[w, v]| - 1)) + 1
//! ```
//!
//! The `- 1` removes the midpoint, which both sub-intervals contain.

use tracing::{debug, instrument};

use crate::dag::CausalDag;

const MIN_PATH_NODES: usize = 5;

/// Midpoint-scaling dimension of `dag`, or 0 when it has no edges or its
/// longest path is shorter than 5 nodes.
#[must_use]
#[instrument(skip(dag), fields(n = dag.node_count()))]
pub fn midpoint_scaling_dimension(dag: &CausalDag) -> f64 {
    if dag.edge_count() == 0 {
        return 0.0;
    }
    let path = dag.longest_path();
    if path.len() < MIN_PATH_NODES {
        return 0.0;
    }
    let (Some(&u), Some(&v)) = (path.first(), path.last()) else {
        return 0.0;
    };

    let interval_size = dag.interval(u, v).count_ones(..);

    let mut best_min = 0;
    let mut best_sizes = (0, 0);
    for &w in &path {
        let lower = dag.interval(u, w).count_ones(..);
        let upper = dag.interval(w, v).count_ones(..);
        if lower.min(upper) > best_min {
            best_min = lower.min(upper);
            best_sizes = (lower, upper);
        }
    }

    let sub_total = (best_sizes.0 + best_sizes.1 - 1) as f64;
    let dimension = (interval_size as f64 / sub_total).log2() + 1.0;
    debug!(
        interval_size,
        lower = best_sizes.0,
        upper = best_sizes.1,
        dimension,
        "midpoint scaling"
    );
    dimension
}
