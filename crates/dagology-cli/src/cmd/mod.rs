//! Subcommand handlers and the JSON edge-list format they share.
//!
//! ```json
//! { "nodes": 4, "edges": [[0, 1], [1, 3], [0, 2]], "coordinates": [[0.0, 0.5], ...] }
//! ```
//!
//! `coordinates` is optional and only written by `sprinkle --coords`.

pub mod de_sitter;
pub mod dimension;
pub mod embed;
pub mod sprinkle;

use anyhow::{Context, Result};
use dagology_core::CausalDag;
use dagology_core::order::OrderMatrix;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeList {
    pub nodes: usize,
    pub edges: Vec<(usize, usize)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Vec<f64>>>,
}

impl EdgeList {
    pub fn from_order(relation: &OrderMatrix) -> Self {
        Self {
            nodes: relation.len(),
            edges: relation.edges().collect(),
            coordinates: None,
        }
    }

    pub fn to_dag(&self) -> dagology_core::Result<CausalDag> {
        CausalDag::from_edges(self.nodes, self.edges.iter().copied())
    }
}

/// Read an edge list from `path`, or stdin when `path` is `-`.
pub fn read_edge_list(path: &Path) -> Result<EdgeList> {
    let mut content = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read edge list from stdin")?;
    } else {
        content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Read an edge list and build its DAG.
pub fn load_dag(path: &Path) -> Result<CausalDag> {
    let list = read_edge_list(path)?;
    let dag = list
        .to_dag()
        .with_context(|| format!("Invalid graph in {}", path.display()))?;
    tracing::debug!(nodes = dag.node_count(), edges = dag.edge_count(), "graph loaded");
    Ok(dag)
}

/// Write an edge list to `path`, or stdout when `path` is `None` or `-`.
pub fn write_edge_list(list: &EdgeList, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            serde_json::to_writer(&mut writer, list)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        _ => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, list)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_list_round_trips_through_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.json");
        let list = EdgeList {
            nodes: 3,
            edges: vec![(0, 1), (1, 2)],
            coordinates: None,
        };
        write_edge_list(&list, Some(&path)).expect("write");
        assert_eq!(read_edge_list(&path).expect("read"), list);
        let dag = load_dag(&path).expect("dag");
        assert_eq!(dag.edge_count(), 2);
    }

    #[test]
    fn cyclic_graph_is_rejected() {
        let list = EdgeList {
            nodes: 2,
            edges: vec![(0, 1), (1, 0)],
            coordinates: None,
        };
        assert!(list.to_dag().is_err());
    }
}
