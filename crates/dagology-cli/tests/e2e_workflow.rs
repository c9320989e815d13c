//! End-to-end CLI tests: sprinkle a causal set, then measure and embed it.
//!
//! Each test runs the `dagology` binary as a subprocess in an isolated temp
//! directory so no user config or cache leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn dagology_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dagology"));
    cmd.current_dir(dir);
    cmd.env("DAGOLOGY_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("config"));
    cmd.env("XDG_CACHE_HOME", dir.join("cache"));
    cmd.env_remove("DAGOLOGY_FORMAT");
    cmd
}

/// Sprinkle a seeded 2D Minkowski interval into `graph.json`.
fn sprinkle(dir: &Path, nodes: usize, seed: u64) -> PathBuf {
    let path = dir.join("graph.json");
    dagology_cmd(dir)
        .args([
            "sprinkle",
            "-n",
            &nodes.to_string(),
            "--seed",
            &seed.to_string(),
            "-o",
        ])
        .arg(&path)
        .assert()
        .success();
    path
}

fn run_json(dir: &Path, args: &[&str], input: &Path) -> Value {
    let output = dagology_cmd(dir)
        .args(args)
        .arg(input)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// sprinkle
// ---------------------------------------------------------------------------

#[test]
fn sprinkle_is_reproducible_with_a_seed() {
    let dir = TempDir::new().expect("temp dir");
    let first = dagology_cmd(dir.path())
        .args(["sprinkle", "-n", "40", "--seed", "11"])
        .output()
        .expect("run");
    let second = dagology_cmd(dir.path())
        .args(["sprinkle", "-n", "40", "--seed", "11"])
        .output()
        .expect("run");
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let graph: Value = serde_json::from_slice(&first.stdout).expect("valid JSON");
    assert_eq!(graph["nodes"], 40);
    assert!(graph.get("coordinates").is_none());
    // Fixed ends: the first element precedes the last.
    let edges = graph["edges"].as_array().expect("edges");
    assert!(edges.iter().any(|e| e[0] == 0 && e[1] == 39));
}

#[test]
fn sprinkle_coords_are_time_sorted() {
    let dir = TempDir::new().expect("temp dir");
    let output = dagology_cmd(dir.path())
        .args(["sprinkle", "-n", "30", "-d", "3", "--seed", "5", "--coords"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let graph: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let coords = graph["coordinates"].as_array().expect("coordinates");
    assert_eq!(coords.len(), 30);
    let times: Vec<f64> = coords
        .iter()
        .map(|row| {
            assert_eq!(row.as_array().expect("row").len(), 3);
            row[0].as_f64().expect("time")
        })
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn sprinkle_random_dag() {
    let dir = TempDir::new().expect("temp dir");
    let output = dagology_cmd(dir.path())
        .args(["sprinkle", "-n", "20", "--space", "random", "--degree", "2", "--seed", "3"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let graph: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(graph["edges"].as_array().expect("edges").len(), 2 * 18 + 1);
}

#[test]
fn sprinkle_rejects_bad_de_sitter_curvature() {
    let dir = TempDir::new().expect("temp dir");
    dagology_cmd(dir.path())
        .args(["sprinkle", "--space", "de-sitter", "--kt2", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2012]"));
}

// ---------------------------------------------------------------------------
// dimension
// ---------------------------------------------------------------------------

#[test]
fn dimension_of_2d_sprinkling_is_near_two() {
    let dir = TempDir::new().expect("temp dir");
    let graph = sprinkle(dir.path(), 200, 42);
    let report = run_json(dir.path(), &["dimension", "--no-cache"], &graph);

    assert_eq!(report["nodes"], 200);
    assert_eq!(report["chain_length"], 2);
    let mm = report["myrheim_meyer"].as_f64().expect("mm");
    assert!((mm - 2.0).abs() < 0.5, "mm = {mm}");
    assert!(report["midpoint_scaling"].as_f64().expect("midpoint") > 0.0);
}

#[test]
fn dimension_writes_lookup_table_to_configured_cache() {
    let dir = TempDir::new().expect("temp dir");
    let graph = sprinkle(dir.path(), 60, 1);
    let cache_dir = dir.path().join("tables");
    std::fs::write(
        dir.path().join("dagology.toml"),
        format!(
            "[cache]\ndirectory = {:?}\n\n[myrheim_meyer]\nchain_length = 3\n",
            cache_dir.display().to_string()
        ),
    )
    .expect("write config");

    let report = run_json(dir.path(), &["dimension"], &graph);
    assert_eq!(report["chain_length"], 3);
    assert!(cache_dir.join("mmd_k3.json").is_file());
}

#[test]
fn dimension_reads_stdin() {
    let dir = TempDir::new().expect("temp dir");
    dagology_cmd(dir.path())
        .args(["dimension", "-", "--no-cache", "--format", "text"])
        .write_stdin(r#"{"nodes": 3, "edges": [[0, 1], [1, 2]]}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3\t2\t2\t"));
}

#[test]
fn cyclic_input_reports_error_code() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cycle.json");
    std::fs::write(&path, r#"{"nodes": 2, "edges": [[0, 1], [1, 0]]}"#).expect("write");
    dagology_cmd(dir.path())
        .arg("dimension")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().expect("temp dir");
    let graph = sprinkle(dir.path(), 10, 2);
    dagology_cmd(dir.path())
        .args(["--config", "nope.toml", "dimension"])
        .arg(&graph)
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// embed
// ---------------------------------------------------------------------------

#[test]
fn embed_emits_one_row_per_node() {
    let dir = TempDir::new().expect("temp dir");
    let graph = sprinkle(dir.path(), 50, 9);
    let report = run_json(dir.path(), &["embed", "-d", "2"], &graph);

    assert_eq!(report["signature"], "lorentzian");
    assert_eq!(report["method"], "naive");
    let coords = report["coordinates"].as_array().expect("coordinates");
    assert_eq!(coords.len(), 50);
    assert!(coords.iter().all(|row| row.as_array().is_some_and(|r| r.len() == 2)));
    // Time runs forward from the interval's bottom to its top.
    assert!(coords[0][0].as_f64() < coords[49][0].as_f64());
}

#[test]
fn embed_with_landmarks_and_two_link() {
    let dir = TempDir::new().expect("temp dir");
    let graph = sprinkle(dir.path(), 50, 4);
    let report = run_json(
        dir.path(),
        &["embed", "--method", "two-link", "--landmarks", "12", "-d", "3"],
        &graph,
    );
    assert_eq!(report["method"], "two-link");
    assert_eq!(report["dimension"], 3);
    assert_eq!(report["coordinates"].as_array().expect("coords").len(), 50);
}

// ---------------------------------------------------------------------------
// de-sitter
// ---------------------------------------------------------------------------

#[test]
fn de_sitter_fits_graph_chain_counts() {
    let dir = TempDir::new().expect("temp dir");
    let graph = sprinkle(dir.path(), 80, 6);
    let report = run_json(dir.path(), &["de-sitter"], &graph);

    assert_eq!(report["chains"][0], 80.0);
    for key in ["height", "dimension", "curvature", "cost"] {
        assert!(report[key].as_f64().is_some_and(f64::is_finite), "{key}");
    }
    assert_eq!(report["residuals"].as_array().expect("residuals").len(), 3);
}

#[test]
fn de_sitter_rejects_negative_counts() {
    let dir = TempDir::new().expect("temp dir");
    dagology_cmd(dir.path())
        .args(["de-sitter", "--chains", "10", "-1", "5", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\": \"E2012\""));
}

#[test]
fn de_sitter_fits_a_graph_without_relations() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("antichain.json");
    std::fs::write(&path, r#"{"nodes": 6, "edges": []}"#).expect("write");
    let report = run_json(dir.path(), &["de-sitter"], &path);

    assert_eq!(report["chains"][0], 6.0);
    assert_eq!(report["chains"][1], 0.0);
    assert_eq!(report["chains"][2], 0.0);
    assert!(report["cost"].as_f64().is_some_and(f64::is_finite));
}
