//! Classic (Torgerson) multidimensional scaling with a Lorentzian option.
//!
//! # Algorithm
//!
//! ```text
//! A = -½ J · ds² · J          J = I - (1/N) 𝟙𝟙ᵀ
//! A = U Λ Uᵀ                  symmetric eigendecomposition
//! X[:, c] = U[:, s_c] · √|λ_{s_c}|
//! ```
//!
//! The selected eigenpairs `s_c` depend on the [`Signature`]:
//!
//! - Euclidean: the D largest eigenvalues.
//! - Lorentzian: the most negative eigenvalue on column 0 (time), then the
//!   D-1 largest. Timelike separations are negative, so a good causal
//!   embedding has exactly one strongly negative eigenvalue.
//!
//! A selected eigenvalue with the wrong sign is clamped to zero. Other
//! negative eigenvalues are left alone; they measure how far the input is
//! from an exact flat embedding.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{DagologyError, Result};

/// Eigenvalues smaller than this fraction of the spectral radius are
/// treated as zero when reporting a clamp.
const CLAMP_REPORT_RATIO: f64 = 1e-9;

/// Metric signature of the embedding space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signature {
    Euclidean,
    #[default]
    Lorentzian,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => f.write_str("euclidean"),
            Self::Lorentzian => f.write_str("lorentzian"),
        }
    }
}

impl FromStr for Signature {
    type Err = DagologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "lorentzian" => Ok(Self::Lorentzian),
            other => Err(DagologyError::UnknownSignature(other.to_string())),
        }
    }
}

/// Selected eigenpairs of a classic embedding.
#[derive(Debug, Clone)]
pub(crate) struct Embedding {
    /// N×D coordinates.
    pub coordinates: DMatrix<f64>,
    /// N×D selected eigenvectors, same column order as `coordinates`.
    pub vectors: DMatrix<f64>,
    /// Per-column scale `sqrt(|λ|)` after clamping; 0 marks a collapsed axis.
    pub roots: Vec<f64>,
    /// Column 0 is the time axis.
    pub timelike: bool,
}

pub(crate) fn check_square(ds2: &DMatrix<f64>) -> Result<usize> {
    let (rows, cols) = ds2.shape();
    if rows != cols {
        return Err(DagologyError::NotSquare { rows, cols });
    }
    Ok(rows)
}

pub(crate) fn check_dimension(d: usize, points: usize) -> Result<()> {
    if d == 0 || d > points {
        return Err(DagologyError::EmbeddingDimension {
            requested: d,
            points,
        });
    }
    Ok(())
}

fn double_center(ds2: &DMatrix<f64>) -> DMatrix<f64> {
    let n = ds2.nrows();
    let nf = n as f64;
    let row_means: Vec<f64> = ds2.row_iter().map(|row| row.sum() / nf).collect();
    let col_means: Vec<f64> = ds2.column_iter().map(|col| col.sum() / nf).collect();
    let grand = row_means.iter().sum::<f64>() / nf;
    DMatrix::from_fn(n, n, |i, j| -0.5 * (ds2[(i, j)] - row_means[i] - col_means[j] + grand))
}

/// Square root of a selected eigenvalue, or 0 when it has the wrong sign
/// for its axis or is negligible against the spectrum's `scale`.
fn sqrt_clamped(value: f64, axis: usize, scale: f64) -> f64 {
    let floor = CLAMP_REPORT_RATIO * scale;
    if value <= floor {
        if value < -floor {
            warn!(axis, eigenvalue = value, "selected eigenvalue has the wrong sign; clamped");
        }
        return 0.0;
    }
    value.sqrt()
}

pub(crate) fn classic_embedding(
    ds2: &DMatrix<f64>,
    d: usize,
    signature: Signature,
) -> Result<Embedding> {
    let n = check_square(ds2)?;
    check_dimension(d, n)?;

    let eigen = SymmetricEigen::new(double_center(ds2));
    let values = &eigen.eigenvalues;
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    let mut descending: Vec<usize> = (0..n).collect();
    descending.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));

    let (selected, timelike) = match signature {
        Signature::Euclidean => (descending[..d].to_vec(), false),
        Signature::Lorentzian => {
            let time = descending[n - 1];
            let mut selected = vec![time];
            selected.extend(descending.iter().copied().filter(|&i| i != time).take(d - 1));
            (selected, true)
        }
    };

    let negative = values.iter().filter(|v| **v < -CLAMP_REPORT_RATIO * scale).count();
    debug!(n, d, %signature, negative, "eigendecomposition done");

    let mut coordinates = DMatrix::<f64>::zeros(n, d);
    let mut vectors = DMatrix::<f64>::zeros(n, d);
    let mut roots = Vec::with_capacity(d);
    for (c, &index) in selected.iter().enumerate() {
        let value = values[index];
        let magnitude = if timelike && c == 0 { -value } else { value };
        let root = sqrt_clamped(magnitude, c, scale);
        let vector = eigen.eigenvectors.column(index);
        vectors.set_column(c, &vector);
        coordinates.set_column(c, &(vector * root));
        roots.push(root);
    }

    Ok(Embedding {
        coordinates,
        vectors,
        roots,
        timelike,
    })
}

/// Embed a squared-separation matrix into `d` dimensions.
///
/// Returns N×d coordinates; under [`Signature::Lorentzian`] column 0 is
/// time. Coordinates are centred and determined up to the sign of each
/// column.
///
/// # Errors
///
/// Returns [`DagologyError::NotSquare`] for a non-square input and
/// [`DagologyError::EmbeddingDimension`] unless `1 <= d <= N`.
#[instrument(skip(ds2), fields(n = ds2.nrows()))]
pub fn mds(ds2: &DMatrix<f64>, d: usize, signature: Signature) -> Result<DMatrix<f64>> {
    Ok(classic_embedding(ds2, d, signature)?.coordinates)
}
