//! All-pairs longest-path matrix by iterated boolean powers.
//!
//! # Algorithm
//!
//! ```text
//! B ← A, i ← 1
//! while B ≠ 0:
//!     LP[p, q] ← max(LP[p, q], i)   for every B[p, q] = 1
//!     B ← B · A, i ← i + 1
//! ```
//!
//! `B` after `i` rounds holds the pairs joined by a path of exactly `i`
//! edges, so the last round that sets an entry carries its longest path.
//! In an acyclic relation on N elements `B` is empty once `i` reaches N; a
//! non-empty power beyond that bound is reported as
//! [`DagologyError::NotAcyclic`].
//!
//! Cost is one boolean product per unit of the diameter, which for dense
//! causal sets approaches N products of N×N relations.

use fixedbitset::FixedBitSet;
use nalgebra::DMatrix;
use tracing::{debug, instrument};

use crate::error::{DagologyError, Result};
use crate::order::matrix::OrderMatrix;

/// Longest directed path lengths, in edges, between every ordered pair.
///
/// `get(i, j)` is zero when `j` is not reachable from `i`, including on
/// the diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongestPathMatrix {
    lengths: DMatrix<u32>,
}

impl LongestPathMatrix {
    /// Wrap an explicit length matrix.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::NotSquare`] for a non-square matrix.
    pub fn from_matrix(lengths: DMatrix<u32>) -> Result<Self> {
        let (rows, cols) = lengths.shape();
        if rows != cols {
            return Err(DagologyError::NotSquare { rows, cols });
        }
        Ok(Self { lengths })
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lengths.nrows()
    }

    /// Return `true` for a matrix over zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Longest path length from `i` to `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.lengths[(i, j)]
    }

    /// Largest entry: the length of the longest path in the relation.
    #[must_use]
    pub fn diameter(&self) -> u32 {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    /// Return `true` if `i` and `j` are causally related in either direction.
    #[must_use]
    pub fn comparable(&self, i: usize, j: usize) -> bool {
        self.get(i, j) > 0 || self.get(j, i) > 0
    }

    /// Elements with a path to `i` (its strict past).
    #[must_use]
    pub fn past(&self, i: usize) -> FixedBitSet {
        let n = self.len();
        let mut set = FixedBitSet::with_capacity(n);
        for w in 0..n {
            if self.get(w, i) > 0 {
                set.insert(w);
            }
        }
        set
    }

    /// Elements reachable from `i` (its strict future).
    #[must_use]
    pub fn future(&self, i: usize) -> FixedBitSet {
        let n = self.len();
        let mut set = FixedBitSet::with_capacity(n);
        for z in 0..n {
            if self.get(i, z) > 0 {
                set.insert(z);
            }
        }
        set
    }

    /// Elements one link above `i`: `LP[i, w] == 1`.
    #[must_use]
    pub fn link_future(&self, i: usize) -> FixedBitSet {
        let n = self.len();
        let mut set = FixedBitSet::with_capacity(n);
        for w in 0..n {
            if self.get(i, w) == 1 {
                set.insert(w);
            }
        }
        set
    }

    /// Reachability relation implied by the lengths.
    #[must_use]
    pub fn to_order(&self) -> OrderMatrix {
        let n = self.len();
        let mut order = OrderMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                if i != j && self.get(i, j) > 0 {
                    // Indices are in range and distinct; insert cannot fail.
                    let _ = order.insert(i, j);
                }
            }
        }
        order
    }
}

/// Compute the longest-path matrix of `relation`.
///
/// With `max_depth = Some(d)`, paths longer than `d` edges are not
/// explored; pairs whose longest path exceeds `d` report the longest
/// length found up to `d`.
///
/// # Errors
///
/// Returns [`DagologyError::NotAcyclic`] if a path of N or more edges
/// exists.
#[instrument(skip(relation), fields(n = relation.len()))]
pub fn longest_path_matrix(
    relation: &OrderMatrix,
    max_depth: Option<usize>,
) -> Result<LongestPathMatrix> {
    let n = relation.len();
    let mut lengths = DMatrix::<u32>::zeros(n, n);
    let mut power = relation.clone();
    let mut length: usize = 1;

    while !power.is_zero() {
        if max_depth.is_some_and(|depth| length > depth) {
            debug!(length, "max depth reached");
            break;
        }
        if length >= n.max(1) {
            return Err(DagologyError::NotAcyclic {
                detail: format!("path of {length} edges in a relation on {n} elements"),
            });
        }

        let value = u32::try_from(length).unwrap_or(u32::MAX);
        for (i, j) in power.edges() {
            lengths[(i, j)] = value;
        }

        power = power.compose(relation);
        length += 1;
    }

    debug!(diameter = length.saturating_sub(1), "longest paths computed");
    Ok(LongestPathMatrix { lengths })
}
