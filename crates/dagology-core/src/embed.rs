//! End-to-end embedding of a DAG into Minkowski space.
//!
//! ```text
//! CausalDag → OrderMatrix → LongestPathMatrix → ds² → Lorentzian MDS
//! ```
//!
//! The returned time axis is oriented so that edges mostly point towards
//! increasing column 0.

use nalgebra::DMatrix;
use tracing::{debug, instrument};

use crate::config::{EmbeddingConfig, SeparationConfig};
use crate::dag::CausalDag;
use crate::error::Result;
use crate::mds::{Signature, landmark_mds, mds};
use crate::order::{OrderMatrix, longest_path_matrix};
use crate::separation::SpacelikeMethod;

/// Embed `dag` into `d`-dimensional Minkowski space with exact MDS.
///
/// Row `i` holds the coordinates of node `i`, time first.
///
/// # Errors
///
/// Returns [`crate::DagologyError::EmbeddingDimension`] unless
/// `1 <= d <= N`, and propagates longest-path errors.
#[instrument(skip(dag), fields(n = dag.node_count()))]
pub fn minkowski_embed(dag: &CausalDag, d: usize, method: SpacelikeMethod) -> Result<DMatrix<f64>> {
    let relation = dag.to_order();
    let lp = longest_path_matrix(&relation, None)?;
    let ds2 = method.separations(&lp, None);
    let mut coords = mds(&ds2, d, Signature::Lorentzian)?;
    orient_time_axis(&mut coords, &relation);
    Ok(coords)
}

/// [`minkowski_embed`] driven by config: separation rule and cap, signature,
/// and optionally landmark MDS.
///
/// # Errors
///
/// Same conditions as [`minkowski_embed`].
#[instrument(skip_all, fields(n = dag.node_count(), d = embedding.dimension))]
pub fn embed_with_config(
    dag: &CausalDag,
    embedding: &EmbeddingConfig,
    separation: &SeparationConfig,
) -> Result<DMatrix<f64>> {
    let relation = dag.to_order();
    let lp = longest_path_matrix(&relation, None)?;
    let ds2 = separation.method.separations(&lp, separation.dmax);
    let mut coords = if embedding.landmarks {
        landmark_mds(
            &ds2,
            embedding.dimension,
            embedding.landmark_count,
            embedding.signature,
            embedding.landmark_selection,
        )?
    } else {
        mds(&ds2, embedding.dimension, embedding.signature)?
    };
    if embedding.signature == Signature::Lorentzian {
        orient_time_axis(&mut coords, &relation);
    }
    Ok(coords)
}

/// Negate column 0 when more edges of `relation` point backwards in time
/// than forwards. Returns whether the axis was flipped.
pub fn orient_time_axis(coords: &mut DMatrix<f64>, relation: &OrderMatrix) -> bool {
    if coords.ncols() == 0 {
        return false;
    }
    let (mut forward, mut backward) = (0_usize, 0_usize);
    for (i, j) in relation.edges() {
        if coords[(i, 0)] < coords[(j, 0)] {
            forward += 1;
        } else if coords[(i, 0)] > coords[(j, 0)] {
            backward += 1;
        }
    }
    let flip = backward > forward;
    if flip {
        coords.column_mut(0).neg_mut();
    }
    debug!(forward, backward, flip, "time axis oriented");
    flip
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> CausalDag {
        CausalDag::from_edges(n, (0..n - 1).map(|i| (i, i + 1))).expect("chain")
    }

    #[test]
    fn chain_lies_on_time_axis() {
        let x = minkowski_embed(&chain(5), 2, SpacelikeMethod::Naive).expect("embed");
        for i in 1..5 {
            assert!((x[(i, 0)] - x[(i - 1, 0)] - 1.0).abs() < 1e-9, "i={i}");
            assert!(x[(i, 1)].abs() < 1e-6);
        }
    }

    #[test]
    fn orientation_flips_backwards_time() {
        let relation = OrderMatrix::from_edges(3, [(0, 1), (1, 2)]).expect("chain");
        let mut coords = DMatrix::from_row_slice(3, 1, &[1.0, 0.0, -1.0]);
        assert!(orient_time_axis(&mut coords, &relation));
        assert!((coords[(2, 0)] - 1.0).abs() < f64::EPSILON);
        assert!(!orient_time_axis(&mut coords, &relation));
    }

    #[test]
    fn config_selects_landmarks() {
        let dag = chain(12);
        let embedding = EmbeddingConfig {
            landmarks: true,
            landmark_count: Some(12),
            ..EmbeddingConfig::default()
        };
        let exact = minkowski_embed(&dag, 2, SpacelikeMethod::Naive).expect("exact");
        let approx =
            embed_with_config(&dag, &embedding, &SeparationConfig::default()).expect("landmark");
        for i in 0..12 {
            assert!((exact[(i, 0)] - approx[(i, 0)]).abs() < 1e-6, "i={i}");
        }
    }

    #[test]
    fn few_landmarks_keep_chain_on_time_axis() {
        let embedding = EmbeddingConfig {
            landmarks: true,
            landmark_count: Some(4),
            ..EmbeddingConfig::default()
        };
        let x = embed_with_config(&chain(12), &embedding, &SeparationConfig::default())
            .expect("landmark");
        for i in 1..12 {
            assert!((x[(i, 0)] - x[(i - 1, 0)] - 1.0).abs() < 1e-6, "i={i}");
        }
        for i in 0..12 {
            assert!(x[(i, 1)].abs() < 1e-6, "i={i}: {}", x[(i, 1)]);
        }
    }

    #[test]
    fn too_many_dimensions() {
        assert!(minkowski_embed(&chain(3), 4, SpacelikeMethod::TwoLink).is_err());
    }
}
