//! Topological ordering and k-chain counting.
//!
//! A k-chain is a totally ordered subset of k elements. Counting works on
//! descendant sets, so the input does not need to be transitively closed:
//!
//! 1. Build `desc(x)` for every node in reverse topological order.
//! 2. `c₂(x) = |desc(x)|` counts the 2-chains starting at `x`.
//! 3. `cₘ₊₁(x) = Σ_{y ∈ desc(x)} cₘ(y)` extends every chain by a new
//!    bottom element.
//!
//! The total is `Σ cₖ(x)`. For k = 2 this is the edge count of the
//! closure.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::error::{DagologyError, Result};
use crate::order::matrix::OrderMatrix;

/// Return the elements in an order where every edge points forward.
///
/// Ties are broken by index (Kahn's algorithm with a FIFO queue).
///
/// # Errors
///
/// Returns [`DagologyError::NotAcyclic`] if some elements never reach
/// in-degree zero.
pub fn topological_order(relation: &OrderMatrix) -> Result<Vec<usize>> {
    let n = relation.len();
    let mut in_degree = vec![0_usize; n];
    for (_, j) in relation.edges() {
        in_degree[j] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(i) = queue.pop_front() {
        order.push(i);
        for j in relation.successors(i) {
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                queue.push_back(j);
            }
        }
    }

    if order.len() != n {
        return Err(DagologyError::NotAcyclic {
            detail: format!("{} of {n} elements lie on or after a cycle", n - order.len()),
        });
    }
    Ok(order)
}

/// Strict descendant set of every element.
///
/// # Errors
///
/// Returns [`DagologyError::NotAcyclic`] for a cyclic relation.
pub fn descendant_sets(relation: &OrderMatrix) -> Result<Vec<FixedBitSet>> {
    let n = relation.len();
    let order = topological_order(relation)?;
    let mut desc: Vec<FixedBitSet> = (0..n).map(|_| FixedBitSet::with_capacity(n)).collect();

    for &x in order.iter().rev() {
        let mut reach = FixedBitSet::with_capacity(n);
        for y in relation.successors(x) {
            reach.insert(y);
            reach.union_with(&desc[y]);
        }
        desc[x] = reach;
    }
    Ok(desc)
}

/// Count the k-chains of `relation`.
///
/// `k = 1` returns N. Counts saturate at `u128::MAX`.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidChainLength`] for `k = 0` and
/// [`DagologyError::NotAcyclic`] for a cyclic relation.
pub fn count_chains(relation: &OrderMatrix, k: usize) -> Result<u128> {
    match k {
        0 => return Err(DagologyError::InvalidChainLength(0)),
        1 => return Ok(relation.len() as u128),
        _ => {}
    }

    let desc = descendant_sets(relation)?;
    let mut counts: Vec<u128> = desc.iter().map(|d| d.count_ones(..) as u128).collect();

    for _ in 2..k {
        counts = desc
            .iter()
            .map(|d| d.ones().fold(0_u128, |acc, y| acc.saturating_add(counts[y])))
            .collect();
    }

    Ok(counts.iter().fold(0_u128, |acc, &c| acc.saturating_add(c)))
}

/// Ordering fraction `S_k / N^k`.
#[must_use]
pub fn ordering_fraction(chains: f64, n: usize, k: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    chains / (n as f64).powi(i32::try_from(k).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binomial(n: u128, k: u128) -> u128 {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn chain_counts_are_binomial() {
        let path = OrderMatrix::from_edges(10, (0..9).map(|i| (i, i + 1))).expect("path");
        for k in 2..=10 {
            assert_eq!(count_chains(&path, k).expect("acyclic"), binomial(10, k as u128), "k={k}");
        }
        assert_eq!(count_chains(&path, 11).expect("acyclic"), 0);
    }

    #[test]
    fn known_example_counts() {
        let a = OrderMatrix::from_edges(6, [(0, 1), (0, 2), (1, 3), (2, 4), (3, 5), (4, 5)])
            .expect("edges");
        assert_eq!(count_chains(&a, 2).expect("acyclic"), 11);
        assert_eq!(count_chains(&a, 3).expect("acyclic"), 8);
        assert_eq!(count_chains(&a, 4).expect("acyclic"), 2);
        assert_eq!(count_chains(&a, 5).expect("acyclic"), 0);
    }

    #[test]
    fn unconnected_has_no_chains() {
        let a = OrderMatrix::new(3);
        assert_eq!(count_chains(&a, 1).expect("acyclic"), 3);
        assert_eq!(count_chains(&a, 2).expect("acyclic"), 0);
        assert_eq!(count_chains(&a, 3).expect("acyclic"), 0);
        assert!(count_chains(&a, 0).is_err());
    }

    #[test]
    fn topological_order_respects_edges() {
        let a = OrderMatrix::from_edges(4, [(3, 1), (1, 0), (2, 0)]).expect("edges");
        let order = topological_order(&a).expect("acyclic");
        let pos = |x: usize| order.iter().position(|&y| y == x).expect("present");
        for (i, j) in a.edges() {
            assert!(pos(i) < pos(j));
        }
    }

    #[test]
    fn ordering_fraction_of_total_order() {
        assert!((ordering_fraction(45.0, 10, 2) - 0.45).abs() < 1e-12);
        assert!(ordering_fraction(1.0, 0, 2).abs() < f64::EPSILON);
    }
}
