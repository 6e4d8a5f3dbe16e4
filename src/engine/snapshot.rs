//! Immutable graph snapshot with precomputed adjacency indices.
//!
//! Every query engine operation loads one snapshot and works entirely
//! in memory against it. Nodes and relationships stay in their insertion-
//! order arenas; id-to-index maps and outgoing/incoming adjacency lists are
//! built once per load so traversals never rescan the relationship list.

use crate::model::{KnowledgeGraph, KnowledgeNode, RelationType, Relationship};
use std::collections::{BTreeSet, HashMap, HashSet};

/// One loaded graph plus its lookup indices.
///
/// A concurrent persist of the same graph id does not affect a snapshot
/// already in hand — queries see the state as of load time.
pub struct GraphSnapshot {
    graph: KnowledgeGraph,
    node_index: HashMap<String, usize>,
    // Per node index: indices into the relationship arena
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl GraphSnapshot {
    /// Build the indices for a loaded graph.
    ///
    /// Relationships with endpoints missing from the node arena are skipped;
    /// the store never persists them, but a snapshot must not panic on a
    /// hand-built graph either.
    pub fn build(graph: KnowledgeGraph) -> Self {
        let node_index: HashMap<String, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        let mut outgoing = vec![Vec::new(); graph.nodes.len()];
        let mut incoming = vec![Vec::new(); graph.nodes.len()];
        for (rel_idx, rel) in graph.relationships.iter().enumerate() {
            let (Some(&from), Some(&to)) = (node_index.get(&rel.from), node_index.get(&rel.to))
            else {
                continue;
            };
            outgoing[from].push(rel_idx);
            incoming[to].push(rel_idx);
        }

        Self {
            graph,
            node_index,
            outgoing,
            incoming,
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    /// Arena index for a node id.
    pub fn index_of(&self, node_id: &str) -> Option<usize> {
        self.node_index.get(node_id).copied()
    }

    /// Node at an arena index.
    pub fn node_at(&self, idx: usize) -> &KnowledgeNode {
        &self.graph.nodes[idx]
    }

    /// Relationship at an arena index.
    pub fn relationship_at(&self, idx: usize) -> &Relationship {
        &self.graph.relationships[idx]
    }

    /// Neighbors of a node treating relationships as undirected.
    ///
    /// Yields `(neighbor_index, relationship_index)` pairs: targets of
    /// outgoing relationships first, then sources of incoming ones, each in
    /// insertion order — BFS tie-breaking depends on this order being
    /// stable. Parallel edges yield one pair each.
    pub fn neighbors(
        &self,
        idx: usize,
        allowed: Option<&HashSet<RelationType>>,
    ) -> Vec<(usize, usize)> {
        let mut result = Vec::new();
        for &rel_idx in &self.outgoing[idx] {
            let rel = &self.graph.relationships[rel_idx];
            if allowed.is_some_and(|set| !set.contains(&rel.rel_type)) {
                continue;
            }
            if let Some(&to) = self.node_index.get(&rel.to) {
                result.push((to, rel_idx));
            }
        }
        for &rel_idx in &self.incoming[idx] {
            let rel = &self.graph.relationships[rel_idx];
            if allowed.is_some_and(|set| !set.contains(&rel.rel_type)) {
                continue;
            }
            if let Some(&from) = self.node_index.get(&rel.from) {
                result.push((from, rel_idx));
            }
        }
        result
    }

    /// Directed successors of a node (targets of its outgoing
    /// relationships), for algorithms that respect edge direction.
    pub fn successors(&self, idx: usize) -> Vec<usize> {
        self.outgoing[idx]
            .iter()
            .filter_map(|&rel_idx| self.node_index.get(&self.graph.relationships[rel_idx].to))
            .copied()
            .collect()
    }

    /// Total relationship count touching the node (out + in).
    pub fn degree(&self, idx: usize) -> usize {
        self.outgoing[idx].len() + self.incoming[idx].len()
    }

    /// The set of relationship types touching the node, in either direction.
    pub fn relation_types(&self, idx: usize) -> BTreeSet<RelationType> {
        self.outgoing[idx]
            .iter()
            .chain(self.incoming[idx].iter())
            .map(|&rel_idx| self.graph.relationships[rel_idx].rel_type)
            .collect()
    }
}
