//! Transitive reduction by successive boolean powers.
//!
//! An edge `i → j` is implied when `j` is also reachable from `i` by a path
//! of two or more edges. Walking the powers `A², A³, …` and clearing every
//! entry they share with `A` leaves the minimal relation with the same
//! closure.
//!
//! The number of powers examined is bounded by `max_path_length` (default
//! N). Passing a tighter bound, such as the diameter of a longest-path
//! matrix computed earlier, only saves work: iteration already stops as
//! soon as a power becomes empty.

use tracing::{debug, instrument};

use crate::order::matrix::OrderMatrix;

/// Return the transitive reduction of `relation`.
#[must_use]
#[instrument(skip(relation), fields(n = relation.len()))]
pub fn transitive_reduction(relation: &OrderMatrix, max_path_length: Option<usize>) -> OrderMatrix {
    let bound = max_path_length.unwrap_or_else(|| relation.len());
    let mut reduced = relation.clone();
    let mut power = relation.clone();

    for length in 2..=bound {
        power = power.compose(relation);
        if power.is_zero() {
            debug!(length, "no paths of this length remain");
            break;
        }
        reduced.difference_with(&power);
    }

    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::closure::transitive_closure;

    fn total_order(n: usize) -> OrderMatrix {
        let edges = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j)));
        OrderMatrix::from_edges(n, edges).expect("total order")
    }

    #[test]
    fn total_order_reduces_to_chain() {
        let reduced = transitive_reduction(&total_order(7), None);
        let expected: Vec<(usize, usize)> = (0..6).map(|i| (i, i + 1)).collect();
        assert_eq!(reduced.edges().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn shortcut_edge_removed_from_unclosed_input() {
        // 0 → 1 → 2 plus the shortcut 0 → 2
        let a = OrderMatrix::from_edges(3, [(0, 1), (1, 2), (0, 2)]).expect("edges");
        let reduced = transitive_reduction(&a, None);
        assert!(!reduced.contains(0, 2));
        assert_eq!(reduced.edge_count(), 2);
    }

    #[test]
    fn reduction_then_closure_reproduces_closed_relation() {
        let a = OrderMatrix::from_edges(6, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (2, 5)])
            .expect("edges");
        let closed = transitive_closure(&a).expect("acyclic");
        let reduced = transitive_reduction(&closed, None);
        assert_eq!(reduced, a);
        assert_eq!(transitive_closure(&reduced).expect("acyclic"), closed);
    }

    #[test]
    fn tight_bound_matches_default() {
        let closed = total_order(5);
        assert_eq!(
            transitive_reduction(&closed, Some(4)),
            transitive_reduction(&closed, None)
        );
    }
}
