//! Order-matrix utilities for causal sets.
//!
//! # Overview
//!
//! Everything here operates purely on an adjacency relation
//! ([`OrderMatrix`]), where `A[i, j] = 1` means `i` is in the strict past
//! of `j`. The relation together with its implied edges must be acyclic;
//! index order does not need to follow causal order.
//!
//! ## Pipeline
//!
//! ```text
//! OrderMatrix (adjacency relation)
//!        ↓  closure::transitive_closure()      (optional)
//!        ↓  reduction::transitive_reduction()  (optional)
//!        ↓  longest_path::longest_path_matrix()
//! LongestPathMatrix
//!        ↓  crate::separation
//! SeparationMatrix (ds²)
//! ```
//!
//! [`chains`] supplies the combinatorial statistics (k-chain counts,
//! ordering fractions) consumed by the dimension estimators.

pub mod chains;
pub mod closure;
pub mod longest_path;
pub mod matrix;
pub mod reduction;

pub use chains::{count_chains, descendant_sets, ordering_fraction, topological_order};
pub use closure::{is_transitively_closed, transitive_closure};
pub use longest_path::{LongestPathMatrix, longest_path_matrix};
pub use matrix::OrderMatrix;
pub use reduction::transitive_reduction;
