//! Causal DAG as a petgraph graph.
//!
//! [`CausalDag`] is the node/edge view used where subgraph structure
//! matters (intervals, longest path node sequences). Node `i` of the DAG is
//! `NodeIndex::new(i)` and carries `i` as its weight, so indices line up
//! with [`OrderMatrix`] rows.

use fixedbitset::FixedBitSet;
use petgraph::{
    Direction,
    algo::{is_cyclic_directed, toposort},
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, Reversed},
};

use crate::error::{DagologyError, Result};
use crate::order::{OrderMatrix, count_chains};

/// A validated directed acyclic graph over nodes `0..n`.
#[derive(Debug, Clone)]
pub struct CausalDag {
    graph: DiGraph<usize, ()>,
}

impl CausalDag {
    /// Create a DAG with `n` isolated nodes.
    #[must_use]
    pub fn new(n: usize) -> Self {
        let mut graph = DiGraph::with_capacity(n, 0);
        for i in 0..n {
            graph.add_node(i);
        }
        Self { graph }
    }

    /// Build a DAG from `(from, to)` pairs. Duplicate edges collapse.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range endpoint, a self-loop, or a cycle.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut dag = Self::new(n);
        for (from, to) in edges {
            for index in [from, to] {
                if index >= n {
                    return Err(DagologyError::IndexOutOfRange { index, len: n });
                }
            }
            if from == to {
                return Err(DagologyError::SelfLoop(from));
            }
            dag.graph.update_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        }

        if is_cyclic_directed(&dag.graph) {
            return Err(DagologyError::NotAcyclic {
                detail: "edge list contains a directed cycle".to_string(),
            });
        }
        Ok(dag)
    }

    /// Build a DAG with one edge per entry of `relation`.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::NotAcyclic`] for a cyclic relation.
    pub fn from_order(relation: &OrderMatrix) -> Result<Self> {
        Self::from_edges(relation.len(), relation.edges())
    }

    /// Adjacency relation of the DAG's edges.
    #[must_use]
    pub fn to_order(&self) -> OrderMatrix {
        let mut order = OrderMatrix::new(self.node_count());
        for (from, to) in self.edges() {
            // Endpoints were validated on construction.
            let _ = order.insert(from, to);
        }
        order
    }

    /// Borrow the underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<usize, ()> {
        &self.graph
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate edges as `(from, to)` index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Node sequence of a longest directed path.
    ///
    /// Ties are broken towards lower node indices, both for the end node and
    /// for each predecessor, so the result is deterministic. Empty for a
    /// graph with no nodes.
    #[must_use]
    pub fn longest_path(&self) -> Vec<usize> {
        let n = self.node_count();
        if n == 0 {
            return Vec::new();
        }
        // Acyclicity is checked on construction.
        let Ok(topo) = toposort(&self.graph, None) else {
            return Vec::new();
        };

        let mut depth = vec![0_usize; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        for v in topo {
            let best = self
                .graph
                .neighbors_directed(v, Direction::Incoming)
                .map(NodeIndex::index)
                .min_by(|&a, &b| depth[b].cmp(&depth[a]).then(a.cmp(&b)));
            if let Some(u) = best {
                depth[v.index()] = depth[u] + 1;
                parent[v.index()] = Some(u);
            }
        }

        let mut end = 0;
        for v in 1..n {
            if depth[v] > depth[end] {
                end = v;
            }
        }

        let mut path = vec![end];
        let mut cursor = end;
        while let Some(u) = parent[cursor] {
            path.push(u);
            cursor = u;
        }
        path.reverse();
        path
    }

    /// Strict descendants of `a`.
    ///
    /// # Panics
    ///
    /// Panics if `a` is out of range.
    #[must_use]
    pub fn descendants(&self, a: usize) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(self.node_count());
        let mut dfs = Dfs::new(&self.graph, NodeIndex::new(a));
        while let Some(node) = dfs.next(&self.graph) {
            set.insert(node.index());
        }
        set.set(a, false);
        set
    }

    /// Strict ancestors of `b`.
    ///
    /// # Panics
    ///
    /// Panics if `b` is out of range.
    #[must_use]
    pub fn ancestors(&self, b: usize) -> FixedBitSet {
        let reversed = Reversed(&self.graph);
        let mut set = FixedBitSet::with_capacity(self.node_count());
        let mut dfs = Dfs::new(reversed, NodeIndex::new(b));
        while let Some(node) = dfs.next(reversed) {
            set.insert(node.index());
        }
        set.set(b, false);
        set
    }

    /// Causal interval `[a, b]`: nodes reachable from `a` that reach `b`,
    /// endpoints included.
    ///
    /// Empty when `b` is not reachable from `a`; `{a}` when `a == b`.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is out of range.
    #[must_use]
    pub fn interval(&self, a: usize, b: usize) -> FixedBitSet {
        let mut future = self.descendants(a);
        future.insert(a);
        let mut past = self.ancestors(b);
        past.insert(b);
        future.intersect_with(&past);
        future
    }

    /// Number of k-chains.
    ///
    /// # Errors
    ///
    /// Returns [`DagologyError::InvalidChainLength`] for `k = 0`.
    pub fn count_chains(&self, k: usize) -> Result<u128> {
        count_chains(&self.to_order(), k)
    }
}
