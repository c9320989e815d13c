//! Spacelike separation matrices derived from longest paths.
//!
//! # Overview
//!
//! A separation matrix `ds²` is symmetric with a zero diagonal:
//!
//! - comparable pair: `ds²[i, j] = -(LP[i, j] + LP[j, i])²` (one term is
//!   always zero, so the magnitude is the squared proper time),
//! - incomparable pair: `ds²[i, j] = d²` for a derived spacelike distance
//!   `d > 0`, capped at `dmax` (default: the longest-path diameter).
//!
//! Two distance rules are provided:
//!
//! - [`naive`]: shortest longest-path between any common ancestor and any
//!   common descendant.
//! - [`two_link`]: average over the shared one-link future of the distance
//!   back to the shared past (Rideout's 2-link rule), coarser but cheaper on
//!   dense graphs.
//!
//! Only the lower triangle is computed; rows are processed in parallel.

pub mod naive;
pub mod two_link;

use std::fmt;
use std::str::FromStr;

use fixedbitset::FixedBitSet;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DagologyError;
use crate::order::LongestPathMatrix;

pub use naive::naive_spacelike_matrix;
pub use two_link::two_link_spacelike_matrix;

/// Symmetric squared-separation matrix (`-+++` convention).
pub type SeparationMatrix = DMatrix<f64>;

/// Rule for distances between incomparable elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacelikeMethod {
    #[default]
    Naive,
    TwoLink,
}

impl SpacelikeMethod {
    /// Build the separation matrix with this rule.
    #[must_use]
    pub fn separations(self, lp: &LongestPathMatrix, dmax: Option<u32>) -> SeparationMatrix {
        match self {
            Self::Naive => naive_spacelike_matrix(lp, dmax),
            Self::TwoLink => two_link_spacelike_matrix(lp, dmax),
        }
    }
}

impl fmt::Display for SpacelikeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive => f.write_str("naive"),
            Self::TwoLink => f.write_str("two-link"),
        }
    }
}

impl FromStr for SpacelikeMethod {
    type Err = DagologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(Self::Naive),
            "two-link" | "two_link" | "twolink" => Ok(Self::TwoLink),
            other => Err(DagologyError::UnknownSpacelikeMethod(other.to_string())),
        }
    }
}

/// Past and future sets of every element, computed once per matrix.
pub(crate) struct CausalSets {
    pub past: Vec<FixedBitSet>,
    pub future: Vec<FixedBitSet>,
}

impl CausalSets {
    pub(crate) fn new(lp: &LongestPathMatrix) -> Self {
        let n = lp.len();
        Self {
            past: (0..n).map(|i| lp.past(i)).collect(),
            future: (0..n).map(|i| lp.future(i)).collect(),
        }
    }
}

pub(crate) fn intersection(a: &FixedBitSet, b: &FixedBitSet) -> FixedBitSet {
    let mut out = a.clone();
    out.intersect_with(b);
    out
}

/// Fill a separation matrix, calling `spacelike(i, j)` for every
/// incomparable pair with `j < i`.
pub(crate) fn build_separations<F>(lp: &LongestPathMatrix, spacelike: F) -> SeparationMatrix
where
    F: Fn(usize, usize) -> f64 + Sync,
{
    let n = lp.len();
    let lower: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..i)
                .map(|j| {
                    let timelike = f64::from(lp.get(i, j) + lp.get(j, i));
                    if timelike > 0.0 {
                        -(timelike * timelike)
                    } else {
                        let d = spacelike(i, j);
                        d * d
                    }
                })
                .collect()
        })
        .collect();

    let mut ds2 = DMatrix::<f64>::zeros(n, n);
    for (i, row) in lower.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            ds2[(i, j)] = value;
            ds2[(j, i)] = value;
        }
    }
    ds2
}
