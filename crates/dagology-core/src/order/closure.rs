//! Transitive closure (completion) by fixed-point iteration.
//!
//! # Algorithm
//!
//! ```text
//! A ← clamp(A · A₀ + A₀, 0, 1)   until A stops changing
//! ```
//!
//! After round `r` the relation holds every pair joined by a path of at
//! most `r + 1` edges. An acyclic relation on N elements has no path longer
//! than `N - 1`, so the fixed point is reached within N rounds. Exceeding
//! that bound, or a fixed point with an element that reaches itself, means
//! the input was not acyclic and is reported as
//! [`DagologyError::NotAcyclic`].

use tracing::{debug, instrument};

use crate::error::{DagologyError, Result};
use crate::order::matrix::OrderMatrix;

/// Return the reflexive-free transitive closure of `relation`.
///
/// # Errors
///
/// Returns [`DagologyError::NotAcyclic`] if the relation contains a cycle.
#[instrument(skip(relation), fields(n = relation.len()))]
pub fn transitive_closure(relation: &OrderMatrix) -> Result<OrderMatrix> {
    let n = relation.len();
    let mut closure = relation.clone();

    for round in 1..=n.max(1) {
        let mut next = closure.compose(relation);
        next.union_with(relation);

        if next == closure {
            debug!(rounds = round, edges = closure.edge_count(), "closure reached fixed point");
            if let Some(&node) = closure.diagonal().first() {
                return Err(DagologyError::NotAcyclic {
                    detail: format!("node {node} reaches itself"),
                });
            }
            return Ok(closure);
        }
        closure = next;
    }

    Err(DagologyError::NotAcyclic {
        detail: format!("closure did not converge within {n} rounds"),
    })
}

/// Return `true` if every two-step path is already a direct edge.
#[must_use]
pub fn is_transitively_closed(relation: &OrderMatrix) -> bool {
    let mut implied = relation.compose(relation);
    implied.difference_with(relation);
    implied.is_zero()
}
