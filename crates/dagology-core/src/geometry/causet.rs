//! Order relations built from coordinates or degree sequences.

use nalgebra::DMatrix;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{DagologyError, Result};
use crate::geometry::Geometry;
use crate::order::OrderMatrix;

/// Build the causal relation of a point set.
///
/// `i → j` is a candidate edge when [`Geometry::precedes`] holds for rows
/// `i` and `j`; every pair is checked, so rows need not be sorted by time.
/// Each candidate is kept independently with probability `p`.
///
/// The result is transitively closed when `p = 1`.
///
/// # Errors
///
/// Returns [`DagologyError::NoCausalOrder`] for Riemannian geometries and
/// [`DagologyError::InvalidParameter`] unless `0 <= p <= 1`.
#[instrument(skip(coords, rng), fields(n = coords.nrows()))]
pub fn causal_set<R: Rng + ?Sized>(
    coords: &DMatrix<f64>,
    geometry: &Geometry,
    p: f64,
    rng: &mut R,
) -> Result<OrderMatrix> {
    if !geometry.has_causal_order() {
        return Err(DagologyError::NoCausalOrder(geometry.name()));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(DagologyError::InvalidParameter(format!(
            "edge probability must lie in [0, 1], got {p}"
        )));
    }

    let n = coords.nrows();
    let points: Vec<Vec<f64>> = coords.row_iter().map(|row| row.iter().copied().collect()).collect();
    let candidates: Vec<Vec<usize>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .filter(|&j| j != i)
                .filter_map(|j| match geometry.precedes(&points[i], &points[j]) {
                    Ok(true) => Some(Ok(j)),
                    Ok(false) => None,
                    Err(err) => Some(Err(err)),
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<_>>()?;

    let mut relation = OrderMatrix::new(n);
    let mut dropped = 0_usize;
    for (i, successors) in candidates.into_iter().enumerate() {
        for j in successors {
            if p < 1.0 && rng.gen_range(0.0..1.0) >= p {
                dropped += 1;
                continue;
            }
            relation.insert(i, j)?;
        }
    }
    debug!(edges = relation.edge_count(), dropped, "causal set built");
    Ok(relation)
}

/// Random DAG with a prescribed `(in, out)` degree sequence.
///
/// Nodes are processed in order. Each node draws its in-edges uniformly
/// from the outstanding out-stubs of earlier nodes, at most one per earlier
/// node, then offers its own out-stubs to later nodes. Leftover out-stubs
/// are discarded, so out-degrees are upper bounds.
///
/// # Errors
///
/// Returns [`DagologyError::InvalidDegreeSequence`] naming the first node
/// whose in-degree cannot be met.
pub fn random_dag<R: Rng + ?Sized>(degrees: &[(usize, usize)], rng: &mut R) -> Result<OrderMatrix> {
    let mut relation = OrderMatrix::new(degrees.len());
    let mut stubs: Vec<usize> = Vec::new();
    for (node, &(in_degree, out_degree)) in degrees.iter().enumerate() {
        let mut allowed = stubs.clone();
        for _ in 0..in_degree {
            if allowed.is_empty() {
                return Err(DagologyError::InvalidDegreeSequence(node));
            }
            let older = allowed.swap_remove(rng.gen_range(0..allowed.len()));
            if let Some(position) = stubs.iter().position(|&s| s == older) {
                stubs.swap_remove(position);
            }
            allowed.retain(|&s| s != older);
            relation.insert(older, node)?;
        }
        stubs.extend(std::iter::repeat_n(node, out_degree));
    }
    Ok(relation)
}
