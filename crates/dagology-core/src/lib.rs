#![forbid(unsafe_code)]
//! dagology-core library.
//!
//! Causal-set analysis of directed acyclic graphs: transitive closure and
//! reduction, longest paths, spacelike separations, dimension estimators
//! and Lorentzian multidimensional scaling.
//!
//! # Conventions
//!
//! - **Errors**: Use [`error::Result`] for fallible operations; degenerate
//!   inputs return a sentinel (dimension 0) instead of failing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Signature**: squared separations follow `-+++` (timelike negative);
//!   embedding column 0 is time.

pub mod cache;
pub mod config;
pub mod dag;
pub mod dimension;
pub mod embed;
pub mod error;
pub mod geometry;
pub mod mds;
pub mod order;
pub mod separation;

pub use cache::{FileCache, LookupCache, LookupTable, MemoryCache};
pub use config::AnalysisConfig;
pub use dag::CausalDag;
pub use dimension::{
    DeSitterEstimate, de_sitter_param_estimate, midpoint_scaling_dimension,
    myrheim_meyer_dimension,
};
pub use embed::minkowski_embed;
pub use error::{DagologyError, ErrorCode, Result};
pub use geometry::{Geometry, Metric};
pub use mds::{LandmarkSelection, Signature, landmark_mds, mds};
pub use order::{
    LongestPathMatrix, OrderMatrix, count_chains, longest_path_matrix, transitive_closure,
    transitive_reduction,
};
pub use separation::{
    SeparationMatrix, SpacelikeMethod, naive_spacelike_matrix, two_link_spacelike_matrix,
};
