//! Boolean adjacency relation stored as one bitset per row.
//!
//! `A[i, j] = 1` means `i` causally precedes `j`. The relation carries no
//! self-loops. Rows are [`FixedBitSet`]s so the boolean product needed by
//! the fixed-point iterations is a union of successor rows:
//!
//! ```text
//! (A · B)[i] = ⋃ { B[k] : k ∈ A[i] }
//! ```
//!
//! Products are evaluated row-parallel with rayon; row order in the result
//! never depends on scheduling.

use fixedbitset::FixedBitSet;
use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::error::{DagologyError, Result};

/// An N×N relation over {0, 1}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMatrix {
    rows: Vec<FixedBitSet>,
}

impl OrderMatrix {
    /// Create an empty relation on `n` elements.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            rows: (0..n).map(|_| FixedBitSet::with_capacity(n)).collect(),
        }
    }

    /// Build a relation from `(from, to)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::IndexOutOfRange`] for an endpoint `>= n` and
    /// [`DagologyError::SelfLoop`] for a pair `(i, i)`.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut order = Self::new(n);
        for (from, to) in edges {
            order.insert(from, to)?;
        }
        Ok(order)
    }

    /// Build a relation from a dense matrix; any non-zero entry is an edge.
    ///
    /// # Errors
    ///
    /// Fails on a non-square matrix or a non-zero diagonal entry.
    pub fn from_dense(matrix: &DMatrix<f64>) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(DagologyError::NotSquare { rows, cols });
        }

        let mut order = Self::new(rows);
        for i in 0..rows {
            for j in 0..cols {
                if matrix[(i, j)] != 0.0 {
                    order.insert(i, j)?;
                }
            }
        }
        Ok(order)
    }

    /// Dense 0/1 copy of the relation.
    #[must_use]
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.len();
        DMatrix::from_fn(n, n, |i, j| if self.contains(i, j) { 1.0 } else { 0.0 })
    }

    /// Number of elements (matrix order N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` for the relation on zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add the edge `from → to`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OrderMatrix::from_edges`].
    pub fn insert(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.len();
        for index in [from, to] {
            if index >= len {
                return Err(DagologyError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Err(DagologyError::SelfLoop(from));
        }
        self.rows[from].insert(to);
        Ok(())
    }

    /// Return `true` if `from → to` is in the relation.
    #[must_use]
    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.rows.get(from).is_some_and(|row| row.contains(to))
    }

    /// Successor set of `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn row(&self, i: usize) -> &FixedBitSet {
        &self.rows[i]
    }

    /// Iterate the direct successors of `i`.
    pub fn successors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows[i].ones()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones(..)).sum()
    }

    /// Return `true` if the relation has no edges.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rows.iter().all(|row| row.ones().next().is_none())
    }

    /// Iterate all edges `(from, to)` in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.ones().map(move |j| (i, j)))
    }

    /// Elements `i` with `A[i, i] = 1`.
    ///
    /// Always empty for relations built through [`OrderMatrix::insert`];
    /// products of a cyclic relation can put entries on the diagonal.
    #[must_use]
    pub fn diagonal(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.rows[i].contains(i)).collect()
    }

    /// Boolean product `self · other`.
    ///
    /// Both relations must have the same order. Debug builds check this;
    /// release builds treat rows missing from `other` as empty.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len(), "relation orders differ");
        let n = self.len();
        let rows = self
            .rows
            .par_iter()
            .map(|row| {
                let mut out = FixedBitSet::with_capacity(n);
                for k in row.ones() {
                    if let Some(next) = other.rows.get(k) {
                        out.union_with(next);
                    }
                }
                out
            })
            .collect();
        Self { rows }
    }

    /// Entry-wise OR, in place.
    pub fn union_with(&mut self, other: &Self) {
        for (row, other_row) in self.rows.iter_mut().zip(&other.rows) {
            row.union_with(other_row);
        }
    }

    /// Remove every entry that is set in `other`, in place.
    pub fn difference_with(&mut self, other: &Self) {
        for (row, other_row) in self.rows.iter_mut().zip(&other.rows) {
            row.difference_with(other_row);
        }
    }

    /// Transposed relation (predecessor rows).
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.len());
        for (i, j) in self.edges() {
            out.rows[j].insert(i);
        }
        out
    }
}
