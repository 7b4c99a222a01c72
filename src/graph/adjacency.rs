// src/graph/adjacency.rs
//! The reviewer-adjacency structure: one node per reviewer, undirected
//! edges weighted by shared-product co-review count.
//!
//! Nodes reference reviewers by id only; the entity store owns the
//! reviewers themselves. BFS marks are not kept here; traversal state
//! lives in a per-query map (see `queries::shortest_path_len`).

use std::collections::{BTreeMap, HashMap};

/// Adjacency of a single reviewer: neighbor id -> co-review count.
#[derive(Debug, Default, Clone)]
pub struct Node {
    edges: HashMap<String, u32>,
}

impl Node {
    /// Edge weight toward `user_id`; 0 when no edge exists.
    #[must_use]
    pub fn weight_to(&self, user_id: &str) -> u32 {
        self.edges.get(user_id).copied().unwrap_or(0)
    }

    /// Number of adjacent reviewers, ignoring edge weight.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = (&str, u32)> {
        self.edges.iter().map(|(id, w)| (id.as_str(), *w))
    }
}

/// Undirected simple graph over reviewer ids.
#[derive(Debug, Default)]
pub struct AdjacencyGraph {
    nodes: BTreeMap<String, Node>,
}

impl AdjacencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the node for `user_id` if it is not present yet.
    pub fn ensure_node(&mut self, user_id: &str) {
        self.nodes.entry(user_id.to_string()).or_default();
    }

    /// Adds 1 to the edge between `a` and `b`, symmetrically, creating it
    /// at weight 1 when absent. Self-edges are not recorded.
    pub fn increment_edge(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.bump(a, b);
        self.bump(b, a);
    }

    fn bump(&mut self, from: &str, to: &str) {
        *self
            .nodes
            .entry(from.to_string())
            .or_default()
            .edges
            .entry(to.to_string())
            .or_insert(0) += 1;
    }

    #[must_use]
    pub fn node(&self, user_id: &str) -> Option<&Node> {
        self.nodes.get(user_id)
    }

    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.nodes.contains_key(user_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in key-sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}
