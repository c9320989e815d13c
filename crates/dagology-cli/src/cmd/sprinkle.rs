//! `dagology sprinkle`: generate a synthetic causal set.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dagology_core::geometry::{
    Geometry, causal_set, cube_space_interval, de_sitter_interval, minkowski_interval, random_dag,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::info;

use crate::cmd::{EdgeList, write_edge_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SprinkleSpace {
    /// Causal interval in flat spacetime.
    Minkowski,
    /// Causal interval in de Sitter space (needs `--kt2`).
    DeSitter,
    /// Unit cube with the componentwise order.
    Cube,
    /// Random DAG where every node draws `--degree` earlier parents.
    Random,
}

#[derive(Args, Debug)]
pub struct SprinkleArgs {
    /// Number of elements.
    #[arg(short = 'n', long, default_value = "100")]
    pub nodes: usize,

    /// Spacetime dimension (cube: number of axes).
    #[arg(short, long, default_value = "2")]
    pub dimension: usize,

    #[arg(long, value_enum, default_value = "minkowski")]
    pub space: SprinkleSpace,

    /// K·T² for de Sitter intervals, in (0, 4).
    #[arg(long, default_value = "1.0")]
    pub kt2: f64,

    /// Probability of keeping each causal relation.
    #[arg(short, long, default_value = "1.0")]
    pub probability: f64,

    /// Parents per node for `--space random`.
    #[arg(long, default_value = "2")]
    pub degree: usize,

    /// Keep the interval endpoints.
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    pub fix_ends: bool,

    /// Random seed; omit for a fresh one.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Include point coordinates in the output.
    #[arg(long)]
    pub coords: bool,

    /// Output file; stdout when omitted or `-`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run_sprinkle(args: &SprinkleArgs) -> Result<()> {
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let (relation, coords) = match args.space {
        SprinkleSpace::Random => {
            let relation = random_dag(&parent_degrees(args.nodes, args.degree), &mut rng)
                .context("Failed to realise degree sequence")?;
            (relation, None)
        }
        space => {
            let (coords, geometry) = match space {
                SprinkleSpace::Minkowski => (
                    minkowski_interval(args.nodes, args.dimension, args.fix_ends, &mut rng)?,
                    Geometry::Minkowski { c: 1.0 },
                ),
                SprinkleSpace::DeSitter => (
                    de_sitter_interval(args.nodes, args.dimension, args.kt2, args.fix_ends, &mut rng)?,
                    Geometry::Minkowski { c: 1.0 },
                ),
                _ => (
                    cube_space_interval(args.nodes, args.dimension, args.fix_ends, &mut rng)?,
                    Geometry::Euclidean,
                ),
            };
            let relation = causal_set(&coords, &geometry, args.probability, &mut rng)?;
            (relation, Some(coords))
        }
    };

    info!(
        nodes = relation.len(),
        edges = relation.edge_count(),
        space = ?args.space,
        "sprinkled"
    );

    let mut list = EdgeList::from_order(&relation);
    if args.coords {
        list.coordinates = coords.map(|c| {
            c.row_iter()
                .map(|row| row.iter().copied().collect())
                .collect()
        });
    }
    write_edge_list(&list, args.output.as_deref())
}

/// `degree` parents per node (fewer for the first nodes) and `degree`
/// out-stubs each. The `degree` most recent nodes always hold a free stub,
/// so the sequence is realisable for any draw order.
fn parent_degrees(n: usize, degree: usize) -> Vec<(usize, usize)> {
    (0..n).map(|i| (degree.min(i), degree)).collect()
}
