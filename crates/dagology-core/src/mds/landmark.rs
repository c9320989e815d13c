//! Landmark MDS for large inputs (de Silva & Tenenbaum).
//!
//! # Algorithm
//!
//! 1. Choose k landmarks ([`LandmarkSelection`]).
//! 2. Embed the k×k landmark block with classic MDS.
//! 3. Place every other point `a` by triangulation against the landmarks:
//!
//! ```text
//! x_a[c] = ½ Σ_l (δ̄[l] - ds²[a, l]) · U[l, c] / √|λ_c|
//! ```
//!
//! where `δ̄` holds the column means of the landmark block. Applied to a
//! landmark this reproduces `U √λ` on spatial axes and `-U √(-λ)` on the
//! time axis, so the time coordinate is negated under the Lorentzian
//! signature to keep one orientation.
//!
//! Cost is one k×k eigendecomposition plus O(N·k·D) for the projection.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{DagologyError, Result};
use crate::mds::classic::{Signature, check_dimension, check_square, classic_embedding};

const MIN_DEFAULT_LANDMARKS: usize = 10;

/// How landmark points are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandmarkSelection {
    /// The first k indices.
    First,
    /// Greedy farthest-point selection on `|ds²|`, seeded at index 0.
    #[default]
    MaxMin,
}

impl fmt::Display for LandmarkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::MaxMin => f.write_str("max-min"),
        }
    }
}

impl FromStr for LandmarkSelection {
    type Err = DagologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "max-min" | "maxmin" | "max_min" => Ok(Self::MaxMin),
            other => Err(DagologyError::UnknownSelection(other.to_string())),
        }
    }
}

/// Default landmark count for a `d`-dimensional embedding of `n` points.
#[must_use]
pub fn default_landmark_count(d: usize, n: usize) -> usize {
    (2 * d).max(d + 1).max(MIN_DEFAULT_LANDMARKS).min(n)
}

fn select_landmarks(ds2: &DMatrix<f64>, k: usize, selection: LandmarkSelection) -> Vec<usize> {
    let n = ds2.nrows();
    match selection {
        LandmarkSelection::First => (0..k).collect(),
        LandmarkSelection::MaxMin => {
            let mut chosen = Vec::with_capacity(k);
            let mut is_chosen = vec![false; n];
            let mut nearest = vec![f64::INFINITY; n];
            let mut next = 0;
            while chosen.len() < k {
                chosen.push(next);
                is_chosen[next] = true;
                for (i, slot) in nearest.iter_mut().enumerate() {
                    *slot = slot.min(ds2[(next, i)].abs());
                }
                let mut best: Option<usize> = None;
                for i in (0..n).filter(|&i| !is_chosen[i]) {
                    if best.is_none_or(|b| nearest[i] > nearest[b]) {
                        best = Some(i);
                    }
                }
                match best {
                    Some(i) => next = i,
                    None => break,
                }
            }
            chosen
        }
    }
}

/// Approximate MDS through `k` landmarks.
///
/// `k` defaults to `max(2d, d + 1, 10)` capped at N. Rows of the result
/// follow the input order. With `k = N` and exact input this matches
/// [`mds`](crate::mds::mds) up to column signs.
///
/// # Errors
///
/// Returns [`DagologyError::NotSquare`] for a non-square input and
/// [`DagologyError::EmbeddingDimension`] when `d` is 0 or exceeds `k`.
#[instrument(skip(ds2), fields(n = ds2.nrows()))]
pub fn landmark_mds(
    ds2: &DMatrix<f64>,
    d: usize,
    k: Option<usize>,
    signature: Signature,
    selection: LandmarkSelection,
) -> Result<DMatrix<f64>> {
    let n = check_square(ds2)?;
    check_dimension(d, n)?;
    let k = k.unwrap_or_else(|| default_landmark_count(d, n)).min(n);
    check_dimension(d, k)?;

    let landmarks = select_landmarks(ds2, k, selection);
    debug!(k, %selection, "landmarks selected");

    let block = DMatrix::from_fn(k, k, |a, b| ds2[(landmarks[a], landmarks[b])]);
    let embedding = classic_embedding(&block, d, signature)?;
    let means: Vec<f64> = block.column_iter().map(|col| col.sum() / k as f64).collect();

    let mut landmark_row = vec![None; n];
    for (row, &index) in landmarks.iter().enumerate() {
        landmark_row[index] = Some(row);
    }

    let mut coordinates = DMatrix::<f64>::zeros(n, d);
    for a in 0..n {
        if let Some(row) = landmark_row[a] {
            coordinates.set_row(a, &embedding.coordinates.row(row));
            continue;
        }
        for c in 0..d {
            let root = embedding.roots[c];
            if root == 0.0 {
                continue;
            }
            let projection: f64 = (0..k)
                .map(|l| (means[l] - ds2[(a, landmarks[l])]) * embedding.vectors[(l, c)])
                .sum();
            let mut value = 0.5 * projection / root;
            if embedding.timelike && c == 0 {
                value = -value;
            }
            coordinates[(a, c)] = value;
        }
    }

    Ok(coordinates)
}
