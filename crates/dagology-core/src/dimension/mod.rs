//! Dimension estimators.
//!
//! | Estimator | Input | Statistic |
//! |-----------|-------|-----------|
//! | [`myrheim_meyer`] | order relation | k-chain ordering fraction |
//! | [`midpoint`] | [`CausalDag`](crate::dag::CausalDag) | interval volume under bisection |
//! | [`de_sitter`] | 1-, 2-, 3-chain counts | least-squares fit of `(T, d, K)` |
//!
//! Degenerate inputs (no edges, unresolvable intervals) yield 0 rather
//! than an error.

pub mod de_sitter;
pub mod midpoint;
pub mod myrheim_meyer;

pub use de_sitter::{
    DeSitterConfig, DeSitterEstimate, de_sitter_param_estimate, expected_chains, height_for_size,
    sphere_volume, sphere_volume_analytic,
};
pub use midpoint::midpoint_scaling_dimension;
pub use myrheim_meyer::{
    build_lookup_table, cached_lookup_table, myrheim_meyer_dimension, myrheim_meyer_estimate,
    myrheim_meyer_formula, myrheim_meyer_lookup, myrheim_meyer_variance,
};
