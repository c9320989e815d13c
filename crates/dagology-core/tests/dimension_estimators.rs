use dagology_core::cache::{FileCache, LookupCache, MemoryCache};
use dagology_core::dag::CausalDag;
use dagology_core::dimension::{
    DeSitterConfig, de_sitter_param_estimate, expected_chains, midpoint_scaling_dimension,
    myrheim_meyer_dimension, myrheim_meyer_formula,
};
use dagology_core::geometry::{Geometry, causal_set, minkowski_interval};
use dagology_core::order::{OrderMatrix, transitive_closure};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[path = "generators.rs"]
mod generators;
use generators::chain;

// Two parallel branches of length 5 between shared endpoints, joined in
// the middle at node 3.
const DIAMOND: [(usize, usize); 20] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 3),
    (3, 4),
    (3, 5),
    (3, 6),
    (4, 7),
    (5, 7),
    (6, 7),
    (1, 8),
    (8, 9),
    (9, 10),
    (10, 11),
    (11, 4),
    (2, 12),
    (12, 13),
    (13, 14),
    (14, 15),
    (15, 6),
];

fn sprinkled_minkowski(n: usize, d: usize, seed: u64) -> OrderMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let coords = minkowski_interval(n, d, true, &mut rng).expect("sprinkle");
    causal_set(&coords, &Geometry::Minkowski { c: 1.0 }, 1.0, &mut rng).expect("causal set")
}

// ---------------------------------------------------------------------------
// Myrheim–Meyer
// ---------------------------------------------------------------------------

#[test]
fn formula_reference_value() {
    let f = myrheim_meyer_formula(2.0, 2).expect("valid");
    assert!((f - 0.25).abs() < 1e-12);
}

#[test]
fn chain_dimension_has_small_size_correction() {
    let relation = transitive_closure(&chain(11)).expect("acyclic");
    let d = myrheim_meyer_dimension(&relation, 2, None).expect("estimate");
    assert!((d - 1.16).abs() < 1e-2, "d={d}");
}

#[test]
fn empty_relation_has_dimension_zero() {
    let relation = OrderMatrix::new(6);
    assert_eq!(myrheim_meyer_dimension(&relation, 2, None).expect("estimate"), 0.0);
}

#[test]
fn sprinkled_minkowski_recovers_dimension() {
    let relation = sprinkled_minkowski(200, 2, 42);
    let mut cache = MemoryCache::new();
    let d = myrheim_meyer_dimension(&relation, 2, Some(&mut cache)).expect("estimate");
    assert!((d - 2.0).abs() < 0.5, "d={d}");

    let d3 = myrheim_meyer_dimension(&sprinkled_minkowski(200, 3, 7), 2, Some(&mut cache))
        .expect("estimate");
    assert!((d3 - 3.0).abs() < 0.6, "d3={d3}");
    assert_eq!(cache.len(), 1);
}

#[test]
fn file_cache_persists_and_recovers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let relation = transitive_closure(&chain(11)).expect("acyclic");

    let mut cache = FileCache::new(dir.path());
    let first = myrheim_meyer_dimension(&relation, 2, Some(&mut cache)).expect("estimate");
    let path = cache.entry_path(2);
    assert!(path.exists());

    let reopened = FileCache::new(dir.path());
    assert!(reopened.get(2).expect("readable").is_some());

    std::fs::write(&path, b"{\"version\": 1, \"k\": 2").expect("corrupt entry");
    assert!(reopened.get(2).is_err());

    let mut cache = FileCache::new(dir.path());
    let again = myrheim_meyer_dimension(&relation, 2, Some(&mut cache)).expect("rebuilt");
    assert!((first - again).abs() < f64::EPSILON);
    assert!(cache.get(2).expect("readable").is_some());
}

// ---------------------------------------------------------------------------
// Midpoint scaling
// ---------------------------------------------------------------------------

#[test]
fn midpoint_line_is_one_dimensional() {
    let dag = CausalDag::from_order(&chain(11)).expect("acyclic");
    assert!((midpoint_scaling_dimension(&dag) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn midpoint_diamond_is_two_dimensional() {
    let dag = CausalDag::from_edges(16, DIAMOND).expect("acyclic");
    assert!((midpoint_scaling_dimension(&dag) - 2.0).abs() < 1e-12);
}

#[test]
fn midpoint_degenerate_graphs() {
    assert_eq!(midpoint_scaling_dimension(&CausalDag::new(0)), 0.0);
    assert_eq!(midpoint_scaling_dimension(&CausalDag::new(3)), 0.0);
}

// ---------------------------------------------------------------------------
// de Sitter
// ---------------------------------------------------------------------------

fn assert_recovers(height: f64, dimension: f64, curvature: f64) {
    let config = DeSitterConfig::default();
    let chains = expected_chains(height, dimension, curvature, config.series_terms);
    let estimate = de_sitter_param_estimate(chains, None, &config).expect("fit");
    assert!(estimate.converged);
    assert!(((estimate.height - height) / height).abs() < 0.05, "{estimate:?}");
    assert!(((estimate.dimension - dimension) / dimension).abs() < 0.05, "{estimate:?}");
    assert!(((estimate.curvature - curvature) / curvature).abs() < 0.05, "{estimate:?}");
    assert!(estimate.residuals.iter().all(|r| r.abs() < 1e-6), "{estimate:?}");
}

#[test]
fn de_sitter_recovers_three_dimensional_parameters() {
    assert_recovers(20.0, 2.0, 0.002);
}

#[test]
fn de_sitter_recovers_two_dimensional_parameters() {
    assert_recovers(30.0, 1.0, 0.001);
}

#[test]
fn de_sitter_reports_poor_fit_instead_of_failing() {
    // Far outside the box: the fit stops at a bound with large residuals.
    let config = DeSitterConfig {
        max_iterations: 50,
        ..DeSitterConfig::default()
    };
    let estimate = de_sitter_param_estimate([1e12, 1.0, 1.0], Some([20.0, 1.0, 0.0]), &config)
        .expect("fit");
    assert!(estimate.residuals.iter().any(|r| r.abs() > 0.1));
    assert!(estimate.height <= 100.0 && estimate.dimension >= 0.01);
}
